//! Startup code MUST route the reset vector to `boot` and the interrupt
//! vector to `isr`, and MUST define `_reset_vector`.

#![no_std]

#[cfg(test)]
extern crate alloc;

pub mod boot;
pub mod irq;
pub mod trap;

pub use boot::{boot_into, BOOT_IRQ_MASK};
pub use irq::{
    enabled_pending, free, get_interrupt_mask, interrupts_enabled, pending_interrupts,
    set_interrupt_mask, set_interrupts_enabled,
};
pub use trap::{decode_trap, isr, Exception, Interrupt, Trap};

#[cfg(target_os = "none")]
pub use boot::boot;
