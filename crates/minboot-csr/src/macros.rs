/// Declares a CSR as a zero-sized type.
///
/// `r` registers get [`Readable`](crate::Readable) only; `rw` registers also
/// get [`Writable`](crate::Writable). The address is spliced into the
/// instruction as an immediate, so each access is exactly one `csrr`, `csrw`,
/// `csrrs` or `csrrc`.
///
/// ```
/// csr::define_csr!(
///     /// Machine scratch register.
///     rw, Mscratch, 0x340
/// );
/// ```
#[macro_export]
macro_rules! define_csr {
    ($(#[$meta:meta])* r, $name:ident, $addr:literal $(,)?) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name;

        impl $crate::Csr for $name {
            const ADDRESS: u16 = $addr;
        }

        impl $crate::Readable for $name {
            #[inline(always)]
            fn csrr() -> usize {
                $crate::__csrr!($addr)
            }
        }
    };

    ($(#[$meta:meta])* rw, $name:ident, $addr:literal $(,)?) => {
        $crate::define_csr!($(#[$meta])* r, $name, $addr);

        impl $crate::Writable for $name {
            #[inline(always)]
            unsafe fn csrw(value: usize) {
                $crate::__csrw!($addr, value)
            }

            #[inline(always)]
            unsafe fn csrrs(mask: usize) -> usize {
                $crate::__csrrs!($addr, mask)
            }

            #[inline(always)]
            unsafe fn csrrc(mask: usize) -> usize {
                $crate::__csrrc!($addr, mask)
            }
        }
    };
}

// None of the blocks below are `nomem`: the compiler must treat every CSR
// access as a memory barrier and keep program order around it.

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrr {
    ($addr:literal) => {{
        let value: usize;
        unsafe {
            ::core::arch::asm!(
                concat!("csrr {0}, ", stringify!($addr)),
                out(reg) value,
                options(nostack, preserves_flags),
            );
        }
        value
    }};
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrw {
    ($addr:literal, $value:expr) => {{
        let value: usize = $value;
        unsafe {
            ::core::arch::asm!(
                concat!("csrw ", stringify!($addr), ", {0}"),
                in(reg) value,
                options(nostack, preserves_flags),
            );
        }
    }};
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrrs {
    ($addr:literal, $mask:expr) => {{
        let mask: usize = $mask;
        let previous: usize;
        unsafe {
            ::core::arch::asm!(
                concat!("csrrs {0}, ", stringify!($addr), ", {1}"),
                out(reg) previous,
                in(reg) mask,
                options(nostack, preserves_flags),
            );
        }
        previous
    }};
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrrc {
    ($addr:literal, $mask:expr) => {{
        let mask: usize = $mask;
        let previous: usize;
        unsafe {
            ::core::arch::asm!(
                concat!("csrrc {0}, ", stringify!($addr), ", {1}"),
                out(reg) previous,
                in(reg) mask,
                options(nostack, preserves_flags),
            );
        }
        previous
    }};
}

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrr {
    ($addr:literal) => {
        $crate::sim::read($addr)
    };
}

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrw {
    ($addr:literal, $value:expr) => {
        $crate::sim::write($addr, $value)
    };
}

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrrs {
    ($addr:literal, $mask:expr) => {
        $crate::sim::set($addr, $mask)
    };
}

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csrrc {
    ($addr:literal, $mask:expr) => {
        $crate::sim::clear($addr, $mask)
    };
}
