//! One-shot ascending limit timer.

use crate::{MasterClock, Ticks};

/// A one-shot timer that counts up from 0 to a limit and then stops.
///
/// The timer runs at its own frequency, derived from the master clock by a
/// rational divider: every master tick adds `frequency_hz` to a phase
/// accumulator and each whole `master_hz` in it is one timer count. This
/// keeps a 32 768 Hz timer exact on a 38.4 MHz master clock without
/// floating point.
///
/// The timer is disabled until [`restart`](Self::restart) arms it. It fires
/// exactly once per arm: the call that reaches the limit returns `true` and
/// disables the timer. Re-arming resets the count to 0 and cancels any expiry
/// that has not yet happened.
#[derive(Debug, Clone)]
pub struct LimitTimer {
    master_hz: u64,
    frequency_hz: u64,
    /// Current count (0..=limit).
    value: u64,
    limit: u64,
    enabled: bool,
    /// Fractional progress towards the next count, in units of 1/master_hz.
    phase: u64,
}

impl LimitTimer {
    /// Create a disabled timer counting at `frequency_hz`.
    ///
    /// A zero frequency is clamped to 1 Hz, a zero master frequency to the
    /// timer frequency.
    #[must_use]
    pub fn new(master: MasterClock, frequency_hz: u64) -> Self {
        let frequency_hz = frequency_hz.max(1);
        Self {
            master_hz: if master.frequency_hz == 0 {
                frequency_hz
            } else {
                master.frequency_hz
            },
            frequency_hz,
            value: 0,
            limit: 0,
            enabled: false,
            phase: 0,
        }
    }

    /// Arm the timer: count from 0 towards `limit`.
    ///
    /// A limit of 0 expires on the next tick.
    pub fn restart(&mut self, limit: u64) {
        self.value = 0;
        self.phase = 0;
        self.limit = limit;
        self.enabled = true;
    }

    /// Stop the timer without firing. The count is kept.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub const fn frequency_hz(&self) -> u64 {
        self.frequency_hz
    }

    /// Advance by one master tick. Returns `true` if the timer expired.
    pub fn tick(&mut self) -> bool {
        self.advance(Ticks::ONE)
    }

    /// Advance by `ticks` master ticks. Returns `true` if the timer expired
    /// somewhere inside the interval.
    pub fn advance(&mut self, ticks: Ticks) -> bool {
        if !self.enabled || ticks == Ticks::ZERO {
            return false;
        }
        if self.value >= self.limit {
            return self.expire();
        }

        let total = u128::from(self.phase)
            + u128::from(ticks.get()) * u128::from(self.frequency_hz);
        let master = u128::from(self.master_hz);
        let counts = total / master;
        let remaining = u128::from(self.limit - self.value);

        if counts >= remaining {
            self.value = self.limit;
            return self.expire();
        }
        self.value += counts as u64;
        self.phase = (total % master) as u64;
        false
    }

    fn expire(&mut self) -> bool {
        self.enabled = false;
        self.phase = 0;
        true
    }
}
