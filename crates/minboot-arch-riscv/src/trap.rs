//! The only interrupt policy is a full reset; `isr` never returns.

use cfg_if::cfg_if;

pub use riscv::register::mcause::{Exception, Interrupt, Trap};

const INTERRUPT_FLAG: usize = 1 << (usize::BITS - 1);

cfg_if! {
    if #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))] {
        /// Interrupt service routine. Resets the core without touching any
        /// register.
        #[no_mangle]
        pub extern "C" fn isr() -> ! {
            service()
        }
    } else {
        /// Interrupt service routine. The simulated reset unwinds, so the
        /// host build needs an unwinding ABI.
        #[no_mangle]
        pub extern "C-unwind" fn isr() -> ! {
            service()
        }
    }
}

#[inline(always)]
fn service() -> ! {
    #[cfg(feature = "debug")]
    {
        let cause = decode_trap(csr::read::<csr::Mcause>());
        debug::writeln!("[TRAP] {:?} at {:#x}, resetting", cause, csr::read::<csr::Mepc>());
    }

    csr::trigger_reset()
}

/// Splits a raw `mcause` into interrupt or exception and its code.
#[inline]
pub fn decode_trap(mcause: usize) -> Trap {
    let code = mcause & !INTERRUPT_FLAG;
    if mcause & INTERRUPT_FLAG != 0 {
        Trap::Interrupt(Interrupt::from(code))
    } else {
        Trap::Exception(Exception::from(code))
    }
}
