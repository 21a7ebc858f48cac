//! Machine description.

use serde::{Deserialize, Serialize};
use silabs_cmu::{CMU_SIZE, CmuConfig};
use silabs_hfxo::{HFXO_SIZE, HfxoConfig};

use crate::MachineError;

/// Clock subsystem layout and timing, usually loaded from JSON.
///
/// ```json
/// { "master_clock_hz": 38400000, "hfxo": { "startup_delay_ticks": 98 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub master_clock_hz: u64,
    pub cmu_base: u32,
    pub hfxo_base: u32,
    pub cmu: CmuConfig,
    pub hfxo: HfxoConfig,
}

impl MachineConfig {
    pub const DEFAULT_MASTER_CLOCK_HZ: u64 = 38_400_000;
    pub const DEFAULT_CMU_BASE: u32 = 0x4000_8000;
    pub const DEFAULT_HFXO_BASE: u32 = 0x4000_C000;

    pub fn from_json(json: &str) -> Result<Self, MachineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, MachineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that need the whole description. Device timing is checked by
    /// the devices themselves.
    pub fn validate(&self) -> Result<(), MachineError> {
        if self.master_clock_hz == 0 {
            return Err(MachineError::ZeroMasterClock);
        }
        let cmu = u64::from(self.cmu_base)..u64::from(self.cmu_base) + u64::from(CMU_SIZE);
        let hfxo = u64::from(self.hfxo_base)..u64::from(self.hfxo_base) + u64::from(HFXO_SIZE);
        if cmu.start < hfxo.end && hfxo.start < cmu.end {
            return Err(MachineError::OverlappingWindows {
                first: "cmu",
                second: "hfxo",
                base: self.cmu_base.max(self.hfxo_base),
            });
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            master_clock_hz: Self::DEFAULT_MASTER_CLOCK_HZ,
            cmu_base: Self::DEFAULT_CMU_BASE,
            hfxo_base: Self::DEFAULT_HFXO_BASE,
            cmu: CmuConfig::default(),
            hfxo: HfxoConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        assert!(MachineConfig::default().validate().is_ok());
    }

    #[test]
    fn overlapping_windows_rejected() {
        let config = MachineConfig {
            hfxo_base: MachineConfig::DEFAULT_CMU_BASE + 0x2000,
            ..MachineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MachineError::OverlappingWindows { .. })
        ));
    }
}
