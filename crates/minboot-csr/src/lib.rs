//! Machine-mode control-and-status register access.
//!
//! Every register is its own zero-sized type, so the address is fixed at
//! build time and a write to a read-only register does not compile:
//!
//! ```compile_fail
//! unsafe { csr::write::<csr::IrqPending>(0) };
//! ```
//!
//! The raw trait methods give no way around that either:
//!
//! ```compile_fail
//! unsafe { <csr::IrqPending as csr::Writable>::csrw(0) };
//! ```
//!
//! On RISC-V targets each primitive is a single CSR instruction. Everywhere
//! else the [`sim`] backend stands in for the hart so the callers can be
//! tested on the host.

#![no_std]

#[macro_use]
mod macros;

use cfg_if::cfg_if;

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
extern crate std;

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
pub mod sim;

/// A control-and-status register at a fixed address.
pub trait Csr {
    const ADDRESS: u16;
}

pub trait Readable: Csr {
    /// Raw `csrr`. Called only by [`read`].
    #[doc(hidden)]
    fn csrr() -> usize;
}

pub trait Writable: Csr {
    /// Raw `csrw`. Called only by [`write`].
    ///
    /// # Safety
    /// See [`write`].
    #[doc(hidden)]
    unsafe fn csrw(value: usize);

    /// Raw `csrrs`. Called only by [`set_bits`].
    ///
    /// # Safety
    /// See [`set_bits`].
    #[doc(hidden)]
    unsafe fn csrrs(mask: usize) -> usize;

    /// Raw `csrrc`. Called only by [`clear_bits`].
    ///
    /// # Safety
    /// See [`clear_bits`].
    #[doc(hidden)]
    unsafe fn csrrc(mask: usize) -> usize;
}

define_csr!(
    /// Machine status.
    rw, Mstatus, 0x300
);
define_csr!(
    /// Per-source interrupt enable mask.
    rw, IrqMask, 0x330
);
define_csr!(
    /// Pending interrupt sources. Driven by hardware.
    r, IrqPending, 0x360
);
define_csr!(
    /// Machine exception program counter.
    r, Mepc, 0x341
);
define_csr!(
    /// Machine trap cause.
    r, Mcause, 0x342
);

pub const MSTATUS: u16 = Mstatus::ADDRESS;
pub const IRQ_MASK: u16 = IrqMask::ADDRESS;
pub const IRQ_PENDING: u16 = IrqPending::ADDRESS;
pub const MEPC: u16 = Mepc::ADDRESS;
pub const MCAUSE: u16 = Mcause::ADDRESS;

/// Global machine interrupt enable, bit 3 of `mstatus`.
pub const MSTATUS_MIE: usize = 0x8;

/// Reads the whole register.
#[inline(always)]
pub fn read<R: Readable>() -> usize {
    R::csrr()
}

/// Replaces the whole register with `value`.
///
/// # Safety
/// Caller owns the consequences of the new value for the running hart, e.g.
/// setting `MIE` inside a section that must not be preempted.
#[inline(always)]
pub unsafe fn write<R: Writable>(value: usize) {
    R::csrw(value)
}

/// Atomically ORs `mask` into the register and returns its previous value.
///
/// # Safety
/// Same contract as [`write`].
#[inline(always)]
pub unsafe fn set_bits<R: Writable>(mask: usize) -> usize {
    R::csrrs(mask)
}

/// Atomically clears the bits of `mask` and returns the previous value.
///
/// # Safety
/// Same contract as [`write`].
#[inline(always)]
pub unsafe fn clear_bits<R: Writable>(mask: usize) -> usize {
    R::csrrc(mask)
}

cfg_if! {
    if #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))] {
        extern "C" {
            // Provided by the startup code.
            fn _reset_vector() -> !;
        }

        /// Jumps straight to the reset vector. No register is touched first.
        #[inline(always)]
        pub fn trigger_reset() -> ! {
            unsafe {
                core::arch::asm!(
                    "j {reset}",
                    reset = sym _reset_vector,
                    options(noreturn),
                )
            }
        }
    } else {
        /// Simulated reset: counts the request and unwinds with
        /// [`sim::ResetRequested`].
        pub fn trigger_reset() -> ! {
            sim::request_reset()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_write_then_read_returns_value() {
        sim::reset();

        unsafe { write::<Mstatus>(0x1888) };
        assert_eq!(read::<Mstatus>(), 0x1888);

        unsafe { write::<IrqMask>(0xdead_beef) };
        assert_eq!(read::<IrqMask>(), 0xdead_beef);

        unsafe { write::<IrqMask>(0) };
        assert_eq!(read::<IrqMask>(), 0);
    }

    #[test]
    fn test_set_bits_returns_previous_and_keeps_others() {
        sim::reset();
        unsafe { write::<IrqMask>(0b1010_0001) };

        for mask in [0usize, 0b1, 0b0101_0000, 0xffff_0000, usize::MAX] {
            let before = read::<IrqMask>();
            let previous = unsafe { set_bits::<IrqMask>(mask) };
            let after = read::<IrqMask>();

            assert_eq!(previous, before);
            assert_eq!(after & mask, mask);
            assert_eq!(after & !mask, before & !mask);
        }
    }

    #[test]
    fn test_clear_bits_returns_previous_and_keeps_others() {
        sim::reset();
        unsafe { write::<Mstatus>(usize::MAX) };

        for mask in [0usize, MSTATUS_MIE, 0x1800, 0xf0f0, usize::MAX] {
            let before = read::<Mstatus>();
            let previous = unsafe { clear_bits::<Mstatus>(mask) };
            let after = read::<Mstatus>();

            assert_eq!(previous, before);
            assert_eq!(after & mask, 0);
            assert_eq!(after & !mask, before & !mask);
        }
    }

    #[test]
    fn test_read_only_registers_follow_hardware() {
        sim::reset();
        sim::poke(IRQ_PENDING, 0b110);
        sim::poke(MCAUSE, 11);

        assert_eq!(read::<IrqPending>(), 0b110);
        assert_eq!(read::<Mcause>(), 11);
        assert_eq!(read::<Mepc>(), 0);
    }

    #[test]
    fn test_addresses() {
        assert_eq!(MSTATUS, 0x300);
        assert_eq!(IRQ_MASK, 0x330);
        assert_eq!(IRQ_PENDING, 0x360);
        assert_eq!(MSTATUS_MIE, 1 << 3);
    }

    #[test]
    fn test_primitives_are_journaled_in_order() {
        sim::reset();

        unsafe {
            write::<IrqMask>(0x1);
            set_bits::<Mstatus>(MSTATUS_MIE);
            clear_bits::<Mstatus>(MSTATUS_MIE);
        }
        let _ = read::<IrqPending>();

        assert_eq!(
            sim::journal(),
            [
                sim::Op::Write(IRQ_MASK, 0x1),
                sim::Op::Set(MSTATUS, MSTATUS_MIE),
                sim::Op::Clear(MSTATUS, MSTATUS_MIE),
                sim::Op::Read(IRQ_PENDING),
            ]
        );
    }

    #[test]
    fn test_trigger_reset_never_returns() {
        sim::reset();
        unsafe { write::<Mstatus>(0x1888) };
        let reached = Cell::new(false);

        let result = sim::catch_reset(|| {
            trigger_reset();
            #[allow(unreachable_code)]
            reached.set(true);
        });

        assert_eq!(result, Err(sim::ResetRequested));
        assert!(!reached.get());
        assert_eq!(sim::resets(), 1);
        assert_eq!(sim::peek(MSTATUS), 0x1888);
        assert_eq!(sim::journal(), [sim::Op::Write(MSTATUS, 0x1888)]);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_catch_reset_forwards_other_panics() {
        let _ = sim::catch_reset(|| panic!("boom"));
    }

    define_csr!(
        /// Scratch register, used to check user-declared registers.
        rw, Mscratch, 0x340
    );

    #[test]
    fn test_user_defined_register() {
        sim::reset();

        assert_eq!(Mscratch::ADDRESS, 0x340);
        unsafe { write::<Mscratch>(42) };
        assert_eq!(read::<Mscratch>(), 42);
        assert_eq!(sim::peek(0x340), 42);
    }
}
