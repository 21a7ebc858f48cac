use silabs_registers::LayoutError;
use thiserror::Error;

/// Errors constructing an HFXO.
#[derive(Debug, Error)]
pub enum HfxoError {
    #[error("register layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("start-up timer frequency must be non-zero")]
    ZeroTimerFrequency,

    #[error("start-up timer ({timer_hz} Hz) cannot run faster than the master clock ({master_hz} Hz)")]
    TimerFasterThanMaster { timer_hz: u64, master_hz: u64 },
}
