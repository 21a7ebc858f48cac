//! Silicon Labs EFR32 series-2 HFXO (high-frequency crystal oscillator).
//!
//! The HFXO is a clock source with a real start-up latency. Software (or
//! the PRS, or the CMU on demand) asks for it, a start-up timer runs, and
//! only when it expires do the ready status bits and interrupts appear.
//!
//! # Start-up paths
//!
//! | Trigger                         | On timer expiry                         |
//! |---------------------------------|-----------------------------------------|
//! | `CTRL.FORCEEN` 0→1              | `STATUS.RDY`, `IF.RDY`                   |
//! | PRS early wake-up               | `STATUS.PRSRDY`, `IF.PRSRDY` only        |
//!
//! A PRS start-up completes only when the CMU selects the HFXO as a clock
//! source ([`Hfxo::notify_selected_as_clock_source`]).
//!
//! # Registers (0x000-0xFFF, SET/CLR/TGL at +0x1000/+0x2000/+0x3000)
//!
//! | Offset | Name      | Notes                                          |
//! |--------|-----------|------------------------------------------------|
//! | 0x000  | IPVERSION | read-only                                      |
//! | 0x010  | XTALCFG   | static                                         |
//! | 0x018  | XTALCTRL  | core bias, tuning caps                         |
//! | 0x020  | CFG       | static                                         |
//! | 0x030  | CTRL      | FORCEEN, DISONDEMAND, PRS status mux selects   |
//! | 0x054  | CMD       | write-only; COREBIASOPT starts calibration     |
//! | 0x058  | STATUS    | read-only                                      |
//! | 0x070  | IF        | interrupt flags                                |
//! | 0x074  | IEN       | interrupt enables                              |
//! | 0x080  | LOCK      | write 0x580E to unlock                         |

mod config;
mod core_bias;
mod error;
mod hfxo;
pub mod registers;
mod sequencer;

pub use config::HfxoConfig;
pub use core_bias::{COREBIAS_POLL_THRESHOLD, COREBIAS_TARGET_HIGH, COREBIAS_TARGET_LOW, CoreBiasCalibration};
pub use error::HfxoError;
pub use hfxo::{HFXO_SIZE, Hfxo};
pub use sequencer::WakeupRequester;

/// What the HFXO needs to know about the clock management unit.
///
/// The CMU implements this and is injected into [`Hfxo::new`].
pub trait ClockManagement: Send + Sync {
    /// Some clock tree branch currently selects the HFXO.
    fn is_requested(&self) -> bool;

    /// The HFXO's register interface clock is on (`CMU_CLKEN0.HFXO0`).
    fn is_enabled(&self) -> bool;
}
