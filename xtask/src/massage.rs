use anyhow::Result;
use clap::Args;

use crate::sh::{ShOptionsBuilder, StreamMode};

/// Massage packages by running cargo fix, clippy, fmt, check, and test
#[derive(Args, Debug)]
pub struct MassageArgs {
    #[command(flatten)]
    workspace: clap_cargo::Workspace,

    /// Enable verbose output (show warnings)
    #[arg(long = "verbose")]
    pub verbose: bool,
}

/// Either `--workspace` or per-package `-p` flags.
pub fn target_flags(workspace: bool, packages: &[String]) -> String {
    if workspace || packages.is_empty() {
        "--workspace".to_string()
    } else {
        packages
            .iter()
            .map(|p| format!("-p {p}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The shell script run by `massage` for the given cargo target flags.
pub fn script(target_flags: &str) -> String {
    // Host run: the CSR crate swaps in its simulator off RISC-V, so the whole
    // workspace tests natively.
    format!(
        r#"
set -e

echo [1/6] Running cargo fix...
cargo fix --allow-dirty --allow-staged --quiet {target_flags}

echo [2/6] Running cargo clippy --fix...
cargo clippy --fix --allow-dirty --allow-staged --quiet {target_flags}

echo [3/6] Running cargo fmt...
cargo fmt --all

echo [4/6] Running cargo check...
cargo check --quiet --all-features {target_flags}

echo [5/6] Running cargo test...
RUST_BACKTRACE=1 cargo test --quiet {target_flags}

echo [6/6] Running cargo test with tracing compiled in...
RUST_BACKTRACE=1 cargo test --quiet --all-features {target_flags}
"#
    )
}

pub fn run(args: MassageArgs) -> Result<()> {
    let target_flags = target_flags(args.workspace.workspace, &args.workspace.package);

    let script = script(&target_flags);

    let quiet = if args.verbose {
        StreamMode::Inherit
    } else {
        StreamMode::Null
    };
    let opts = ShOptionsBuilder::default().stderr(quiet).build()?;
    log::info!("massaging {}", target_flags);
    crate::sh!(options(opts), script)?;
    Ok(())
}
