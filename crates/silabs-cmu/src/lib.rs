//! Silicon Labs EFR32 series-2 CMU (clock management unit).
//!
//! Only the clock tree the HFXO cares about is modelled: whether any branch
//! selects the HFXO, whether its bus clock is gated on, and when SYSCLK is
//! switched over to it.
//!
//! | Offset | Name            | Notes                                   |
//! |--------|-----------------|-----------------------------------------|
//! | 0x000  | IPVERSION       | read-only                               |
//! | 0x008  | STATUS          | CALRDY, LOCK                            |
//! | 0x010  | LOCK            | write 0x93F7 to unlock                  |
//! | 0x020  | IF / IEN        | CALRDY, CALOF                           |
//! | 0x064  | CLKEN0          | bit 20 gates the HFXO register clock    |
//! | 0x070  | SYSCLKCTRL      | CLKSEL = HFXO (3) selects the HFXO      |
//! | 0x120  | EM01GRPACLKCTRL | CLKSEL = HFXO (2) or HFXORT (6)         |
//!
//! SYSCLKCTRL writes are discarded while the CMU is locked.

mod cmu;
mod config;
mod error;
pub mod registers;
mod signals;
mod state;

pub use cmu::{CMU_SIZE, Cmu};
pub use config::CmuConfig;
pub use error::CmuError;
pub use signals::CmuSignals;
