//! The assembled clock subsystem.

use std::collections::BTreeMap;

use emu_core::{
    ClockSource, DoubleWordPeripheral, IrqLine, MasterClock, Observable, Tickable, Ticks, Value,
};
use silabs_cmu::Cmu;
use silabs_hfxo::Hfxo;

use crate::memory::{AddressMap, Device};
use crate::{MachineConfig, MachineError};

/// CMU and HFXO on one bus, driven by one virtual clock.
///
/// Device entry points take the clock lock themselves, so the machine only
/// sequences calls: a CMU write that switches SYSCLK to the HFXO is
/// delivered to the HFXO after the CMU has released the lock.
pub struct Efr32 {
    config: MachineConfig,
    clock: ClockSource,
    map: AddressMap,
    cmu: Cmu,
    hfxo: Hfxo,
}

impl Efr32 {
    pub fn new(config: MachineConfig) -> Result<Self, MachineError> {
        config.validate()?;
        let clock = ClockSource::new(MasterClock::new(config.master_clock_hz));
        let cmu = Cmu::new(clock.clone(), config.cmu)?;
        let mut hfxo = Hfxo::new(clock.clone(), cmu.signals(), config.hfxo)?;
        hfxo.on_enabled_transition(cmu.hfxo_enable_listener());
        log::debug!(
            "efr32: cmu at {:#010X}, hfxo at {:#010X}, {} Hz master clock",
            config.cmu_base,
            config.hfxo_base,
            config.master_clock_hz
        );
        Ok(Self {
            map: AddressMap::new(&config),
            config,
            clock,
            cmu,
            hfxo,
        })
    }

    /// Build from a JSON machine description.
    pub fn from_json(json: &str) -> Result<Self, MachineError> {
        Self::new(MachineConfig::from_json(json)?)
    }

    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    #[must_use]
    pub fn now(&self) -> Ticks {
        self.clock.now()
    }

    #[must_use]
    pub fn cmu(&self) -> &Cmu {
        &self.cmu
    }

    #[must_use]
    pub fn hfxo(&self) -> &Hfxo {
        &self.hfxo
    }

    pub fn hfxo_mut(&mut self) -> &mut Hfxo {
        &mut self.hfxo
    }

    #[must_use]
    pub fn hfxo_irq(&self) -> IrqLine {
        self.hfxo.irq()
    }

    #[must_use]
    pub fn cmu_irq(&self) -> IrqLine {
        self.cmu.irq()
    }

    /// Base address of a peripheral window.
    #[must_use]
    pub fn base(&self, device: Device) -> u32 {
        self.map.base(device)
    }

    pub fn read_double_word(&mut self, address: u32) -> u32 {
        let Some((device, offset)) = self.map.decode(address) else {
            log::warn!("efr32: read from unmapped address {address:#010X}");
            return 0;
        };
        log::trace!("efr32: {} read at {offset:#06X}", device.name());
        match device {
            Device::Cmu => self.cmu.read_double_word(offset),
            Device::Hfxo => self.hfxo.read_double_word(offset),
        }
    }

    pub fn write_double_word(&mut self, address: u32, value: u32) {
        let Some((device, offset)) = self.map.decode(address) else {
            log::warn!("efr32: write {value:#010X} to unmapped address {address:#010X} dropped");
            return;
        };
        log::trace!("efr32: {} write {value:#010X} at {offset:#06X}", device.name());
        match device {
            Device::Cmu => {
                self.cmu.write_double_word(offset, value);
                if self.cmu.take_hfxo_selection() {
                    self.hfxo.notify_selected_as_clock_source();
                }
            }
            Device::Hfxo => self.hfxo.write_double_word(offset, value),
        }
    }

    /// PRS early wake-up line into the HFXO.
    pub fn prs_early_wakeup(&mut self) {
        self.hfxo.on_early_wakeup_request();
    }

    /// Advance virtual time by `ticks` master clock ticks.
    pub fn run_for(&mut self, ticks: Ticks) {
        self.tick_n(ticks);
    }

    /// Advance virtual time by `micros` microseconds.
    pub fn run_for_micros(&mut self, micros: u64) {
        let ticks = self.clock.master().ticks_for_micros(micros);
        self.tick_n(ticks);
    }

    /// Reset every device and rewind virtual time.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.cmu.reset();
        self.hfxo.reset();
    }

    /// Every observable path and its current value, as JSON.
    pub fn state_json(&self) -> Result<String, MachineError> {
        let state: BTreeMap<String, Value> = self
            .query_paths()
            .into_iter()
            .filter_map(|path| self.query(&path).map(|value| (path, value)))
            .collect();
        Ok(serde_json::to_string_pretty(&state)?)
    }
}

impl Tickable for Efr32 {
    fn tick(&mut self) {
        self.tick_n(Ticks::ONE);
    }

    fn tick_n(&mut self, count: Ticks) {
        self.clock.advance(count);
        self.hfxo.tick_n(count);
    }
}

impl Observable for Efr32 {
    fn query(&self, path: &str) -> Option<Value> {
        if path == "now" {
            return Some(self.clock.now().get().into());
        }
        if let Some(rest) = path.strip_prefix("hfxo.") {
            return self.hfxo.query(rest);
        }
        if let Some(rest) = path.strip_prefix("cmu.") {
            return self.cmu.query(rest);
        }
        None
    }

    fn query_paths(&self) -> Vec<String> {
        let mut paths = vec!["now".to_string()];
        paths.extend(self.hfxo.query_paths().into_iter().map(|p| format!("hfxo.{p}")));
        paths.extend(self.cmu.query_paths().into_iter().map(|p| format!("cmu.{p}")));
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_reads_zero() {
        let mut machine = Efr32::new(MachineConfig::default()).expect("valid machine");
        assert_eq!(machine.read_double_word(0x2000_0000), 0);
        machine.write_double_word(0x2000_0000, 0xFFFF_FFFF);
        assert_eq!(machine.read_double_word(0x2000_0000), 0);
    }

    #[test]
    fn queries_are_prefixed() {
        let machine = Efr32::new(MachineConfig::default()).expect("valid machine");
        let paths = machine.query_paths();
        assert!(paths.iter().any(|p| p == "hfxo.STATUS.RDY"));
        assert!(paths.iter().any(|p| p == "cmu.SYSCLKCTRL.CLKSEL"));
        assert_eq!(machine.query("hfxo.STATUS.RDY"), Some(Value::Bool(false)));
        assert_eq!(machine.query("nope"), None);
    }

    #[test]
    fn run_for_advances_virtual_time() {
        let mut machine = Efr32::new(MachineConfig::default()).expect("valid machine");
        machine.run_for(Ticks::new(100));
        machine.tick();
        assert_eq!(machine.now(), Ticks::new(101));
        machine.run_for_micros(1);
        assert_eq!(machine.now(), Ticks::new(139));
        machine.reset();
        assert_eq!(machine.now(), Ticks::ZERO);
    }
}
