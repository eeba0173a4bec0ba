//! Latches that carry button presses from interrupt context into the tick task.
//!
//! A latch is a single slot, not a queue. [CommandLatch] holds at most one pending
//! [Command]: the button side overwrites it (last write wins) and the tick side
//! reads and clears it in one atomic swap. [ToggleLatch] is a level that every
//! press flips and the tick side only reads.
//!
//! Both are backed by single byte atomics so a write can never tear, which lets
//! them live in a `static` shared between an EXTI waker task and the scheduler.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// nothing pending
    #[default]
    None = 0,

    /// raise the setpoint by one degree
    Increase = 1,

    /// lower the setpoint by one degree
    Decrease = 2,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::None => "none",
            Command::Increase => "increase",
            Command::Decrease => "decrease",
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Command::Increase,
            2 => Command::Decrease,
            _ => Command::None,
        }
    }
}

pub struct CommandLatch {
    slot: AtomicU8,
}

impl CommandLatch {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(Command::None as u8),
        }
    }

    /// Called from the button side. Replaces whatever is pending.
    pub fn post(&self, command: Command) {
        self.slot.store(command as u8, Ordering::Release);
    }

    /// Called from the tick side. Returns the pending command and leaves
    /// [Command::None] behind, even if nothing was pending.
    pub fn take(&self) -> Command {
        Command::from_bits(self.slot.swap(Command::None as u8, Ordering::AcqRel))
    }
}

impl Default for CommandLatch {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ToggleLatch {
    requested: AtomicBool,
}

impl ToggleLatch {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Flips the request, returns the new level
    pub fn toggle(&self) -> bool {
        !self.requested.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Default for ToggleLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_latch_has_nothing_pending() {
        let latch = CommandLatch::new();
        assert_eq!(latch.take(), Command::None);
    }

    #[test]
    fn later_command_overwrites_earlier_one() {
        let latch = CommandLatch::new();
        latch.post(Command::Increase);
        latch.post(Command::Decrease);

        assert_eq!(latch.take(), Command::Decrease);
        assert_eq!(latch.take(), Command::None);
    }

    #[test]
    fn take_clears_the_slot() {
        let latch = CommandLatch::new();
        latch.post(Command::Increase);

        assert_eq!(latch.take(), Command::Increase);
        assert_eq!(latch.take(), Command::None);
    }

    #[test]
    fn toggle_flips_level_on_every_press() {
        let latch = ToggleLatch::new();
        assert!(!latch.is_requested());

        assert!(latch.toggle());
        assert!(latch.is_requested());

        assert!(!latch.toggle());
        assert!(!latch.is_requested());
    }
}
