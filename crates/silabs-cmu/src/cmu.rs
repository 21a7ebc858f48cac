//! The CMU peripheral.

use std::collections::BTreeMap;
use std::sync::Arc;

use emu_core::{ClockSource, DoubleWordPeripheral, IrqLine, Observable, Value};
use silabs_hfxo::ClockManagement;
use silabs_registers::RegisterBank;

use crate::registers::{self, STATUS_LOCK};
use crate::state::CmuState;
use crate::{CmuConfig, CmuError, CmuSignals};

/// Size of the CMU address window, alias windows included.
pub const CMU_SIZE: u32 = 0x4000;

const MODEL_PATHS: &[&str] = &[
    "hfxo_requested",
    "hfxo_enabled",
    "hfxo_enable_events",
    "pending_hfxo_selection",
    "irq",
];

/// EFR32 series-2 clock management unit, reduced to the parts that drive
/// the HFXO.
pub struct Cmu {
    bank: RegisterBank<CmuState>,
    state: CmuState,
    clock: ClockSource,
    config: CmuConfig,
}

impl Cmu {
    pub fn new(clock: ClockSource, config: CmuConfig) -> Result<Self, CmuError> {
        let bank = registers::build_bank(&config)?;
        let mut state = CmuState::new();
        state.reset(bank.file());
        Ok(Self {
            bank,
            state,
            clock,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> CmuConfig {
        self.config
    }

    /// The view the HFXO is constructed with.
    #[must_use]
    pub fn signals(&self) -> Arc<CmuSignals> {
        Arc::clone(&self.state.signals)
    }

    /// A callback for `Hfxo::on_enabled_transition` that counts start-ups.
    #[must_use]
    pub fn hfxo_enable_listener(&self) -> Box<dyn FnMut() + Send> {
        let signals = self.signals();
        Box::new(move || signals.record_hfxo_enable())
    }

    #[must_use]
    pub fn hfxo_enable_events(&self) -> u64 {
        self.state.signals.hfxo_enable_events()
    }

    /// Consume a pending "SYSCLK now runs from the HFXO" event.
    pub fn take_hfxo_selection(&mut self) -> bool {
        std::mem::take(&mut self.state.pending_hfxo_selection)
    }

    #[must_use]
    pub fn irq(&self) -> IrqLine {
        self.state.irq.clone()
    }

    /// `STATUS.LOCK`.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.bank.file().field(STATUS_LOCK) == registers::LOCK_LOCKED
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<(u32, u32)> {
        self.bank.snapshot()
    }
}

impl DoubleWordPeripheral for Cmu {
    fn read_double_word(&mut self, offset: u32) -> u32 {
        self.clock
            .execute_in_lock(|_| self.bank.read_double_word(&mut self.state, offset))
    }

    fn write_double_word(&mut self, offset: u32, value: u32) {
        self.clock
            .execute_in_lock(|_| self.bank.write_double_word(&mut self.state, offset, value));
    }

    fn size(&self) -> u32 {
        CMU_SIZE
    }

    fn reset(&mut self) {
        self.clock.execute_in_lock(|_| {
            self.bank.reset();
            self.state.reset(self.bank.file());
        });
    }
}

impl Observable for Cmu {
    fn query(&self, path: &str) -> Option<Value> {
        let signals = &self.state.signals;
        match path {
            "hfxo_requested" => Some(signals.is_requested().into()),
            "hfxo_enabled" => Some(signals.is_enabled().into()),
            "hfxo_enable_events" => Some(signals.hfxo_enable_events().into()),
            "pending_hfxo_selection" => Some(self.state.pending_hfxo_selection.into()),
            "irq" => Some(self.state.irq.is_asserted().into()),
            "registers" => Some(Value::Map(
                self.bank
                    .snapshot()
                    .into_iter()
                    .map(|(offset, value)| (format!("{offset:#05X}"), Value::U32(value)))
                    .collect::<BTreeMap<_, _>>(),
            )),
            _ => self.bank.query(path),
        }
    }

    fn query_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = MODEL_PATHS.iter().map(|p| (*p).to_string()).collect();
        paths.push("registers".to_string());
        paths.extend(self.bank.query_paths());
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{SET_OFFSET, SYSCLKCTRL, sysclk_sel};
    use emu_core::MasterClock;

    fn make_cmu() -> Cmu {
        Cmu::new(ClockSource::new(MasterClock::new(1_000_000)), CmuConfig::default())
            .expect("valid cmu")
    }

    #[test]
    fn window_size() {
        assert_eq!(make_cmu().size(), 0x4000);
    }

    #[test]
    fn selection_is_taken_once() {
        let mut cmu = make_cmu();
        assert!(!cmu.take_hfxo_selection());
        cmu.write_double_word(SYSCLKCTRL, sysclk_sel::HFXO);
        assert!(cmu.take_hfxo_selection());
        assert!(!cmu.take_hfxo_selection());
    }

    #[test]
    fn listener_counts_into_signals() {
        let cmu = make_cmu();
        let mut listener = cmu.hfxo_enable_listener();
        listener();
        listener();
        assert_eq!(cmu.hfxo_enable_events(), 2);
        assert_eq!(cmu.query("hfxo_enable_events"), Some(Value::U64(2)));
    }

    #[test]
    fn interrupt_follows_enabled_flags() {
        let mut cmu = make_cmu();
        cmu.write_double_word(registers::IF + SET_OFFSET, 0b10);
        assert!(!cmu.irq().is_asserted());
        cmu.write_double_word(registers::IEN, 0b10);
        assert!(cmu.irq().is_asserted());
    }

    #[test]
    fn reset_drops_pending_selection() {
        let mut cmu = make_cmu();
        cmu.write_double_word(SYSCLKCTRL, sysclk_sel::HFXO);
        cmu.reset();
        assert!(!cmu.take_hfxo_selection());
        assert!(!cmu.signals().is_requested());
    }
}
