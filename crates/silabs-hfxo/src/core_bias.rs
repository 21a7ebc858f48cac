//! Core bias optimisation readiness.
//!
//! Firmware starts the optimisation with `CMD.COREBIASOPT` and then polls
//! `STATUS.COREBIASOPTRDY` until it reads 1. The model completes on the
//! tenth poll after a start, so the state advances on reads.

/// Polls after a start until the optimisation reports ready.
pub const COREBIAS_POLL_THRESHOLD: u32 = 10;

/// Target when ramping the core bias up from the lower half of its range.
pub const COREBIAS_TARGET_HIGH: u32 = 0x1A0;

/// Target when ramping down from the upper half.
pub const COREBIAS_TARGET_LOW: u32 = 0x060;

/// Midpoint of the 9-bit `XTALCTRL.COREBIASANA` range.
const COREBIAS_MIDPOINT: u32 = 0x100;

/// Debounced readiness counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreBiasCalibration {
    pending: bool,
    polls: u32,
    completed: bool,
}

impl CoreBiasCalibration {
    /// Begin (or restart) an optimisation. The poll count starts over.
    pub fn start(&mut self) {
        self.pending = true;
        self.polls = 0;
        self.completed = false;
    }

    /// Abandon any optimisation in progress.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub const fn polls(&self) -> u32 {
        self.polls
    }

    /// One read of the ready bit, whose stored value is `stored`.
    ///
    /// While pending, polls 1 to 9 report not ready and poll 10 reports
    /// ready and ends the optimisation. With nothing pending the counter
    /// is cleared and the stored bit is reported unchanged.
    pub fn poll(&mut self, stored: bool) -> bool {
        if !self.pending {
            self.polls = 0;
            return stored;
        }
        self.polls += 1;
        if self.polls < COREBIAS_POLL_THRESHOLD {
            return false;
        }
        self.pending = false;
        self.polls = 0;
        self.completed = true;
        true
    }

    /// Whether an optimisation finished since the last call.
    pub fn take_completed(&mut self) -> bool {
        std::mem::take(&mut self.completed)
    }

    /// Where an optimisation starting from `current` ends up.
    #[must_use]
    pub const fn target(current: u32) -> u32 {
        if current < COREBIAS_MIDPOINT {
            COREBIAS_TARGET_HIGH
        } else {
            COREBIAS_TARGET_LOW
        }
    }
}
