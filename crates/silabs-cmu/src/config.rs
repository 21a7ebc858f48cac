//! CMU construction parameters.

use serde::{Deserialize, Serialize};

/// Reset-time clock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmuConfig {
    /// `CLKEN0.HFXO0` out of reset. Parts without a CLKEN0 gate behave as
    /// if it were always set.
    pub hfxo_clock_enabled: bool,
    /// Reset value of `SYSCLKCTRL.CLKSEL`.
    pub sysclk_source: u32,
}

impl Default for CmuConfig {
    fn default() -> Self {
        Self {
            hfxo_clock_enabled: true,
            sysclk_source: crate::registers::sysclk_sel::FSRCO,
        }
    }
}
