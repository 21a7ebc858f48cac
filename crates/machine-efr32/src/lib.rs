//! EFR32 series-2 clock subsystem.
//!
//! Wires a [`Cmu`](silabs_cmu::Cmu) and an [`Hfxo`](silabs_hfxo::Hfxo) to
//! one [`ClockSource`](emu_core::ClockSource) and one address space:
//!
//! | Base          | Device | Window  |
//! |---------------|--------|---------|
//! | `0x4000_8000` | CMU    | 0x4000  |
//! | `0x4000_C000` | HFXO   | 0x4000  |
//!
//! Bases are configurable through [`MachineConfig`].

mod config;
mod efr32;
mod error;
mod memory;

pub use config::MachineConfig;
pub use efr32::Efr32;
pub use error::MachineError;
pub use memory::Device;
