use anyhow::{ensure, Result};
use clap::Args;

use crate::sh::{ShOptionsBuilder, StreamMode};

/// Crates that end up in the firmware image. `xtask` itself is host-only.
pub const FIRMWARE_PACKAGES: &[&str] = &[
    "minboot-csr",
    "minboot-debug",
    "minboot-arch-riscv",
    "minboot",
];

/// Build the firmware crates for a bare-metal RISC-V target
#[derive(Args, Debug)]
pub struct CrossArgs {
    /// Rust target triple
    #[arg(long, default_value = "riscv32imac-unknown-none-elf")]
    pub target: String,

    /// Build with the release profile
    #[arg(long)]
    pub release: bool,

    /// Compile boot tracing in
    #[arg(long)]
    pub debug: bool,

    /// Also run clippy for the target
    #[arg(long)]
    pub clippy: bool,
}

pub fn cargo_command(subcommand: &str, args: &CrossArgs) -> Result<String> {
    ensure!(
        args.target.starts_with("riscv32") || args.target.starts_with("riscv64"),
        "`{}` is not a RISC-V target",
        args.target
    );

    let mut cmd = format!("cargo {subcommand} --target {}", args.target);
    for package in FIRMWARE_PACKAGES {
        cmd.push_str(" -p ");
        cmd.push_str(package);
    }
    if args.release {
        cmd.push_str(" --release");
    }
    if args.debug {
        cmd.push_str(" --features minboot/debug");
    }
    Ok(cmd)
}

pub fn run(args: CrossArgs) -> Result<()> {
    let installed = crate::sh!(
        options(ShOptionsBuilder::default().stdout(StreamMode::Pipe).build()?),
        "rustup target list --installed"
    )?;
    if !installed.stdout.lines().any(|line| line.trim() == args.target) {
        log::warn!(
            "target {} not installed, run `rustup target add {}`",
            args.target,
            args.target
        );
    }

    let build = cargo_command("build", &args)?;
    log::info!("{}", build);
    crate::sh!(build)?;

    if args.clippy {
        let clippy = cargo_command("clippy", &args)?;
        log::info!("{}", clippy);
        crate::sh!(clippy)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(target: &str) -> CrossArgs {
        CrossArgs {
            target: target.to_string(),
            release: false,
            debug: false,
            clippy: false,
        }
    }

    #[test]
    fn test_build_command_lists_firmware_packages() {
        let cmd = cargo_command("build", &args("riscv32imac-unknown-none-elf")).unwrap();
        assert_eq!(
            cmd,
            "cargo build --target riscv32imac-unknown-none-elf \
             -p minboot-csr -p minboot-debug -p minboot-arch-riscv -p minboot"
        );
    }

    #[test]
    fn test_flags() {
        let mut a = args("riscv64imac-unknown-none-elf");
        a.release = true;
        a.debug = true;
        let cmd = cargo_command("clippy", &a).unwrap();
        assert!(cmd.starts_with("cargo clippy --target riscv64imac-unknown-none-elf"));
        assert!(cmd.ends_with("--release --features minboot/debug"));
    }

    #[test]
    fn test_rejects_non_riscv_target() {
        assert!(cargo_command("build", &args("x86_64-unknown-linux-gnu")).is_err());
    }
}
