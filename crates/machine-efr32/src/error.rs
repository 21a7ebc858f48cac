use silabs_cmu::CmuError;
use silabs_hfxo::HfxoError;
use thiserror::Error;

/// Errors building a machine or reading its description.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("hfxo: {0}")]
    Hfxo(#[from] HfxoError),

    #[error("cmu: {0}")]
    Cmu(#[from] CmuError),

    #[error("machine description: {0}")]
    Description(#[from] serde_json::Error),

    #[error("master clock frequency must be non-zero")]
    ZeroMasterClock,

    #[error("{first} and {second} windows overlap at {base:#010X}")]
    OverlappingWindows {
        first: &'static str,
        second: &'static str,
        base: u32,
    },
}
