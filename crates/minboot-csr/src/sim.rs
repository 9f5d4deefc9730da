//! Host stand-in for the hart's CSR file.
//!
//! State is per thread so tests running in parallel do not see each other's
//! registers. Every register reads as zero until written or poked.

use std::boxed::Box;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::thread_local;
use std::vec::Vec;

/// One CSR primitive, as issued by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Read(u16),
    Write(u16, usize),
    Set(u16, usize),
    Clear(u16, usize),
}

impl Op {
    /// Whether the op may change the register.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Op::Read(_))
    }
}

/// Unwind payload of a simulated [`trigger_reset`](crate::trigger_reset).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetRequested;

#[derive(Default)]
struct Hart {
    regs: BTreeMap<u16, usize>,
    journal: Vec<Op>,
    resets: usize,
}

thread_local! {
    static HART: RefCell<Hart> = RefCell::new(Hart::default());
}

fn with_hart<R>(f: impl FnOnce(&mut Hart) -> R) -> R {
    HART.with(|hart| f(&mut *hart.borrow_mut()))
}

/// Zeroes every register, the journal and the reset counter.
pub fn reset() {
    with_hart(|hart| *hart = Hart::default());
}

/// Current register value, bypassing the journal.
pub fn peek(addr: u16) -> usize {
    with_hart(|hart| hart.regs.get(&addr).copied().unwrap_or(0))
}

/// Forces a register value the way hardware would, bypassing the journal
/// and the read-only restriction.
pub fn poke(addr: u16, value: usize) {
    with_hart(|hart| {
        hart.regs.insert(addr, value);
    });
}

/// Every primitive issued since the last [`reset`].
pub fn journal() -> Vec<Op> {
    with_hart(|hart| hart.journal.clone())
}

/// Number of reset requests since the last [`reset`].
pub fn resets() -> usize {
    with_hart(|hart| hart.resets)
}

/// Runs `f`, turning a simulated reset into `Err(ResetRequested)`.
/// Any other panic keeps unwinding.
pub fn catch_reset<R>(f: impl FnOnce() -> R) -> Result<R, ResetRequested> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<ResetRequested>() {
            Ok(reset) => Err(*reset),
            Err(payload) => panic::resume_unwind(payload),
        },
    }
}

pub(crate) fn request_reset() -> ! {
    with_hart(|hart| hart.resets += 1);
    // resume_unwind skips the panic hook, so a reset is not reported as a
    // test failure on stderr.
    panic::resume_unwind(Box::new(ResetRequested))
}

#[doc(hidden)]
pub fn read(addr: u16) -> usize {
    with_hart(|hart| {
        hart.journal.push(Op::Read(addr));
        hart.regs.get(&addr).copied().unwrap_or(0)
    })
}

#[doc(hidden)]
pub fn write(addr: u16, value: usize) {
    with_hart(|hart| {
        hart.journal.push(Op::Write(addr, value));
        hart.regs.insert(addr, value);
    })
}

#[doc(hidden)]
pub fn set(addr: u16, mask: usize) -> usize {
    with_hart(|hart| {
        hart.journal.push(Op::Set(addr, mask));
        let reg = hart.regs.entry(addr).or_insert(0);
        let previous = *reg;
        *reg |= mask;
        previous
    })
}

#[doc(hidden)]
pub fn clear(addr: u16, mask: usize) -> usize {
    with_hart(|hart| {
        hart.journal.push(Op::Clear(addr, mask));
        let reg = hart.regs.entry(addr).or_insert(0);
        let previous = *reg;
        *reg &= !mask;
        previous
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_poke_are_not_journaled() {
        reset();
        poke(0x360, 0x3);

        assert_eq!(peek(0x360), 0x3);
        assert!(journal().is_empty());
    }

    #[test]
    fn test_reset_clears_state() {
        write(0x330, 1);
        let _ = catch_reset(|| {
            request_reset();
        });
        reset();

        assert_eq!(peek(0x330), 0);
        assert_eq!(resets(), 0);
        assert!(journal().is_empty());
    }

    #[test]
    fn test_is_mutation() {
        assert!(!Op::Read(0x300).is_mutation());
        assert!(Op::Write(0x300, 0).is_mutation());
        assert!(Op::Set(0x300, 0).is_mutation());
        assert!(Op::Clear(0x300, 0).is_mutation());
    }

    #[test]
    fn test_state_is_per_thread() {
        reset();
        write(0x330, 7);

        let other = std::thread::spawn(|| peek(0x330)).join().unwrap();

        assert_eq!(other, 0);
        assert_eq!(peek(0x330), 7);
    }
}
