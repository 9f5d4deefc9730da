//! Application-facing surface: the CSR layer, interrupt control and tracing
//! under one crate.
//!
//! ```
//! use minboot::irq;
//!
//! minboot::csr::sim::reset();
//! let old = irq::get_interrupt_mask();
//! irq::set_interrupt_mask(old | 0b10);
//! assert_eq!(irq::get_interrupt_mask(), 0b10);
//! ```

#![no_std]

pub use csr;
pub use debug;

#[cfg(feature = "arch-riscv")]
pub use arch_riscv::{boot, irq, trap};

#[cfg(feature = "arch-riscv")]
pub use arch_riscv::{free, isr, BOOT_IRQ_MASK};
