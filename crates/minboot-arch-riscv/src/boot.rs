use crate::irq;
use cfg_if::cfg_if;

/// Mask installed at reset: only source 0 may signal.
pub const BOOT_IRQ_MASK: u32 = 0x1;

/// Brings interrupts to their steady state and enters `entry`.
///
/// The mask is written before `MIE` is set; in the other order a stale
/// pending source could fire between the two writes.
#[inline(always)]
pub fn boot_into<F: FnOnce()>(entry: F) {
    irq::set_interrupt_mask(BOOT_IRQ_MASK);
    irq::set_interrupts_enabled(true);

    debug::writeln!("[BOOT] irq mask={:#x} ie=1", BOOT_IRQ_MASK);

    entry()
}

cfg_if! {
    if #[cfg(target_os = "none")] {
        extern "C" {
            // Application entry point.
            fn main();
        }

        /// Reset entry point, reached once the startup code has a stack.
        ///
        /// Returns only if `main` does.
        #[no_mangle]
        pub extern "C" fn boot() {
            debug::writeln!("[BOOT] boot");
            boot_into(|| unsafe { main() });
        }
    }
}
