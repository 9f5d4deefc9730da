//! Boot tracing.
//!
//! With the `debug` feature off, [`writeln!`] type-checks its arguments and
//! emits no code. With it on, bare-metal builds hand each line to the
//! platform's `__debug_write`; host builds print to stderr.

#![no_std]

#[cfg(all(feature = "debug", not(target_os = "none")))]
extern crate std;

use cfg_if::cfg_if;
use core::fmt;

#[macro_export]
macro_rules! writeln {
    ($($arg:tt)*) => {
        $crate::__writeln!($($arg)*)
    };
}

#[cfg(feature = "debug")]
#[doc(hidden)]
#[macro_export]
macro_rules! __writeln {
    ($($arg:tt)*) => {
        $crate::write_line(format_args!($($arg)*))
    };
}

#[cfg(not(feature = "debug"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __writeln {
    ($($arg:tt)*) => {
        if false {
            $crate::discard(format_args!($($arg)*))
        }
    };
}

#[doc(hidden)]
#[inline(always)]
pub fn discard(_args: fmt::Arguments<'_>) {}

/// Whether tracing is compiled in.
pub const ENABLED: bool = cfg!(feature = "debug");

cfg_if! {
    if #[cfg(all(feature = "debug", target_os = "none"))] {
        extern "C" {
            // Platform console hook.
            fn __debug_write(ptr: *const u8, len: usize);
        }

        struct Console;

        impl fmt::Write for Console {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                unsafe { __debug_write(s.as_ptr(), s.len()) };
                Ok(())
            }
        }

        #[doc(hidden)]
        pub fn write_line(args: fmt::Arguments<'_>) {
            use core::fmt::Write;
            let _ = Console.write_fmt(args);
            let _ = Console.write_str("\n");
        }
    } else if #[cfg(feature = "debug")] {
        #[doc(hidden)]
        pub fn write_line(args: fmt::Arguments<'_>) {
            std::eprintln!("{}", args);
        }
    }
}
