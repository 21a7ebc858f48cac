//! Master clock configuration and the shared virtual time source.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::Ticks;

/// Master clock configuration for a system.
///
/// Each system has a master clock that drives all timing. Peripheral timers
/// may run at divided rates, but everything derives from this frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MasterClock {
    /// Clock frequency in Hz (e.g., `38_400_000` for a 38.4 MHz crystal).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Master ticks covering `micros` microseconds (integer division),
    /// saturating at `u64::MAX`.
    #[must_use]
    pub const fn ticks_for_micros(&self, micros: u64) -> Ticks {
        let ticks = self.frequency_hz as u128 * micros as u128 / 1_000_000;
        if ticks > u64::MAX as u128 {
            Ticks::new(u64::MAX)
        } else {
            Ticks::new(ticks as u64)
        }
    }
}

/// Shared virtual time and the lock that serialises every device driven
/// from it.
///
/// Bus accesses and timer expiries may run on different threads. Device
/// entry points take the lock once, with [`execute_in_lock`], and do all
/// their work inside the closure. The lock is not re-entrant: code already
/// inside a closure must not call back into another entry point of the same
/// clock source.
///
/// [`execute_in_lock`]: ClockSource::execute_in_lock
#[derive(Debug, Clone)]
pub struct ClockSource {
    master: MasterClock,
    now: Arc<Mutex<Ticks>>,
}

impl ClockSource {
    #[must_use]
    pub fn new(master: MasterClock) -> Self {
        Self {
            master,
            now: Arc::new(Mutex::new(Ticks::ZERO)),
        }
    }

    #[must_use]
    pub const fn master(&self) -> MasterClock {
        self.master
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Ticks {
        *self.guard()
    }

    /// Run `f` with the clock lock held, passing the current virtual time.
    pub fn execute_in_lock<R>(&self, f: impl FnOnce(Ticks) -> R) -> R {
        let now = self.guard();
        f(*now)
    }

    /// Move virtual time forward and return the new time.
    pub fn advance(&self, ticks: Ticks) -> Ticks {
        let mut now = self.guard();
        *now += ticks;
        *now
    }

    /// Rewind virtual time to zero (machine reset).
    pub fn reset(&self) {
        *self.guard() = Ticks::ZERO;
    }

    // The guarded value is a plain counter, so a panic elsewhere cannot
    // leave it half-updated.
    fn guard(&self) -> MutexGuard<'_, Ticks> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_convert_without_overflow() {
        let master = MasterClock::new(38_400_000);
        assert_eq!(master.ticks_for_micros(1), Ticks::new(38));
        assert_eq!(master.ticks_for_micros(1_000_000), Ticks::new(38_400_000));
        // 38.4 MHz times 1e12 us does not fit the intermediate u64.
        assert_eq!(
            master.ticks_for_micros(1_000_000_000_000),
            Ticks::new(38_400_000_000_000)
        );
        assert_eq!(master.ticks_for_micros(u64::MAX), Ticks::new(u64::MAX));
    }

    #[test]
    fn clones_share_time() {
        let clock = ClockSource::new(MasterClock::new(1_000));
        let other = clock.clone();
        clock.advance(Ticks::new(5));
        assert_eq!(other.now(), Ticks::new(5));
        assert_eq!(other.execute_in_lock(|now| now.get() * 2), 10);
    }

    #[test]
    fn reset_rewinds() {
        let clock = ClockSource::new(MasterClock::new(1_000));
        clock.advance(Ticks::new(42));
        clock.reset();
        assert_eq!(clock.now(), Ticks::ZERO);
    }

    #[test]
    fn micros_to_ticks() {
        let master = MasterClock::new(38_400_000);
        assert_eq!(master.ticks_for_micros(1), Ticks::new(38));
        assert_eq!(master.ticks_for_micros(1_000), Ticks::new(38_400));
    }
}
