//! HFXO construction parameters.

use emu_core::MasterClock;
use serde::{Deserialize, Serialize};

use crate::HfxoError;

/// Start-up timing of the oscillator.
///
/// Machine descriptions supply this; absent keys take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HfxoConfig {
    /// Rate of the start-up timer in Hz.
    pub timer_frequency_hz: u64,
    /// Start-up latency in timer ticks.
    pub startup_delay_ticks: u64,
}

impl HfxoConfig {
    pub const DEFAULT_TIMER_FREQUENCY_HZ: u64 = 32_768;
    /// About 3 ms at 32 768 Hz.
    pub const DEFAULT_STARTUP_DELAY_TICKS: u64 = 98;

    /// Check the timing against the machine's master clock.
    pub fn validate(&self, master: MasterClock) -> Result<(), HfxoError> {
        if self.timer_frequency_hz == 0 {
            return Err(HfxoError::ZeroTimerFrequency);
        }
        if self.timer_frequency_hz > master.frequency_hz {
            return Err(HfxoError::TimerFasterThanMaster {
                timer_hz: self.timer_frequency_hz,
                master_hz: master.frequency_hz,
            });
        }
        Ok(())
    }
}

impl Default for HfxoConfig {
    fn default() -> Self {
        Self {
            timer_frequency_hz: Self::DEFAULT_TIMER_FREQUENCY_HZ,
            startup_delay_ticks: Self::DEFAULT_STARTUP_DELAY_TICKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: HfxoConfig =
            serde_json::from_str(r#"{ "startup_delay_ticks": 10 }"#).expect("valid json");
        assert_eq!(config.timer_frequency_hz, 32_768);
        assert_eq!(config.startup_delay_ticks, 10);
    }

    #[test]
    fn validate_rejects_bad_rates() {
        let master = MasterClock::new(38_400_000);
        assert!(HfxoConfig::default().validate(master).is_ok());

        let zero = HfxoConfig {
            timer_frequency_hz: 0,
            ..HfxoConfig::default()
        };
        assert!(matches!(zero.validate(master), Err(HfxoError::ZeroTimerFrequency)));

        let fast = HfxoConfig {
            timer_frequency_hz: 50_000_000,
            ..HfxoConfig::default()
        };
        assert!(matches!(
            fast.validate(master),
            Err(HfxoError::TimerFasterThanMaster { .. })
        ));
    }
}
