//! Interrupt enable, mask and pending accessors.
//!
//! Each accessor is one CSR primitive. Nothing here caches a register value
//! across an instruction an interrupt could land on.

use csr::{IrqMask, IrqPending, Mstatus, MSTATUS_MIE};

#[inline]
pub fn interrupts_enabled() -> bool {
    csr::read::<Mstatus>() & MSTATUS_MIE != 0
}

/// Sets or clears `mstatus.MIE`; no other `mstatus` bit changes.
#[inline]
pub fn set_interrupts_enabled(enabled: bool) {
    // SAFETY: single hart, machine mode; only MIE is touched.
    unsafe {
        if enabled {
            csr::set_bits::<Mstatus>(MSTATUS_MIE);
        } else {
            csr::clear_bits::<Mstatus>(MSTATUS_MIE);
        }
    }
}

#[inline]
pub fn get_interrupt_mask() -> u32 {
    csr::read::<IrqMask>() as u32
}

#[inline]
pub fn set_interrupt_mask(mask: u32) {
    // SAFETY: the mask only gates which sources may signal.
    unsafe { csr::write::<IrqMask>(mask as usize) }
}

#[inline]
pub fn pending_interrupts() -> u32 {
    csr::read::<IrqPending>() as u32
}

/// Pending sources that are also unmasked, i.e. the ones that fire as soon
/// as `MIE` is set.
#[inline]
pub fn enabled_pending() -> u32 {
    pending_interrupts() & get_interrupt_mask()
}

/// Runs `f` with `MIE` clear, then restores `MIE` only if it was set before.
///
/// The previous state comes from the `csrrc` that disables interrupts, so no
/// interrupt can slip in between sampling and clearing.
#[inline]
pub fn free<R>(f: impl FnOnce() -> R) -> R {
    // SAFETY: only MIE is touched and it is restored below.
    let previous = unsafe { csr::clear_bits::<Mstatus>(MSTATUS_MIE) };
    let result = f();
    if previous & MSTATUS_MIE != 0 {
        unsafe { csr::set_bits::<Mstatus>(MSTATUS_MIE) };
    }
    result
}
