//! Core traits and types for peripheral emulation.
//!
//! Everything ticks at the master clock frequency. Slower timers derive
//! their rate from it through [`LimitTimer`]'s divider, and every device
//! that can be reached from more than one thread serialises through the
//! shared [`ClockSource`] lock.

mod bus;
mod clock;
mod irq;
mod observable;
mod tickable;
mod ticks;
mod timer;

pub use bus::DoubleWordPeripheral;
pub use clock::{ClockSource, MasterClock};
pub use irq::IrqLine;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
pub use timer::LimitTimer;
