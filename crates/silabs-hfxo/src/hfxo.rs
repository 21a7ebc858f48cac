//! The HFXO peripheral: register bank, sequencer and bus entry points.

use std::collections::BTreeMap;
use std::sync::Arc;

use emu_core::{
    ClockSource, DoubleWordPeripheral, IrqLine, LimitTimer, Observable, Tickable, Ticks, Value,
};
use silabs_registers::RegisterBank;

use crate::registers::{
    self, CTRL_PRSSTATUSSEL0, CTRL_PRSSTATUSSEL1, STATUS_COREBIASOPTRDY, STATUS_ENS,
    STATUS_PRSHWREQ, STATUS_PRSRDY, STATUS_RDY, prs_status_sel,
};
use crate::sequencer::HfxoState;
use crate::{ClockManagement, HfxoConfig, HfxoError, WakeupRequester};

/// Size of the HFXO address window, alias windows included.
pub const HFXO_SIZE: u32 = 0x4000;

const MODEL_PATHS: &[&str] = &[
    "requester",
    "force_enabled",
    "on_demand_enabled",
    "irq",
    "timer.enabled",
    "timer.value",
    "timer.limit",
    "core_bias.pending",
    "core_bias.polls",
    "static_violations",
];

/// EFR32 series-2 high-frequency crystal oscillator.
///
/// Every public entry point takes the clock source lock exactly once.
pub struct Hfxo {
    bank: RegisterBank<HfxoState>,
    state: HfxoState,
    clock: ClockSource,
    config: HfxoConfig,
}

impl Hfxo {
    /// Build an HFXO driven by `clock` that consults `cmu` for on-demand
    /// requests.
    pub fn new(
        clock: ClockSource,
        cmu: Arc<dyn ClockManagement>,
        config: HfxoConfig,
    ) -> Result<Self, HfxoError> {
        config.validate(clock.master())?;
        let bank = registers::build_bank()?;
        let timer = LimitTimer::new(clock.master(), config.timer_frequency_hz);
        let mut state = HfxoState::new(timer, config.startup_delay_ticks, cmu);
        state.reset(bank.file());
        Ok(Self {
            bank,
            state,
            clock,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> HfxoConfig {
        self.config
    }

    /// The interrupt output. Clones observe the same line.
    #[must_use]
    pub fn irq(&self) -> IrqLine {
        self.state.irq.clone()
    }

    /// Register a callback run whenever a PRS wake-up starts the oscillator.
    pub fn on_enabled_transition(&mut self, listener: Box<dyn FnMut() + Send>) {
        self.state.listeners.push(listener);
    }

    /// PRS early wake-up. Ignored unless the oscillator is idle.
    pub fn on_early_wakeup_request(&mut self) {
        self.clock
            .execute_in_lock(|_| self.state.early_wakeup(self.bank.file_mut()));
    }

    /// The CMU has selected the HFXO as a clock source.
    pub fn notify_selected_as_clock_source(&mut self) {
        self.clock
            .execute_in_lock(|_| self.state.selected_as_clock_source(self.bank.file_mut()));
    }

    /// Level of PRS producer `channel` (0 or 1), as selected by
    /// `CTRL.PRSSTATUSSEL0/1`. Unmodelled selections output 0.
    #[must_use]
    pub fn prs_status_output(&self, channel: u8) -> bool {
        let select = match channel {
            0 => CTRL_PRSSTATUSSEL0,
            1 => CTRL_PRSSTATUSSEL1,
            _ => {
                log::warn!("hfxo: no PRS status channel {channel}");
                return false;
            }
        };
        self.clock.execute_in_lock(|_| {
            let file = self.bank.file();
            match file.field(select) {
                prs_status_sel::DISABLED => false,
                prs_status_sel::ENS => file.flag(STATUS_ENS),
                prs_status_sel::COREBIASOPTRDY => file.flag(STATUS_COREBIASOPTRDY),
                prs_status_sel::RDY => file.flag(STATUS_RDY),
                prs_status_sel::PRSRDY => file.flag(STATUS_PRSRDY),
                prs_status_sel::HWREQ => self.state.is_requested_on_demand(),
                prs_status_sel::PRSHWREQ => file.flag(STATUS_PRSHWREQ),
                _ => false,
            }
        })
    }

    #[must_use]
    pub fn wakeup_requester(&self) -> WakeupRequester {
        self.state.requester
    }

    /// `STATUS.RDY`.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.bank.file().flag(STATUS_RDY)
    }

    /// `STATUS.ENS`.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.bank.file().flag(STATUS_ENS)
    }

    /// `(offset, value)` of every register, without running providers.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(u32, u32)> {
        self.bank.snapshot()
    }

    fn warn_if_unclocked(&self, address: u32) {
        if !self.state.cmu.is_enabled() {
            log::warn!("hfxo: access at {address:#06X} with CMU_CLKEN0.HFXO0 clear");
        }
    }
}

impl DoubleWordPeripheral for Hfxo {
    fn read_double_word(&mut self, offset: u32) -> u32 {
        self.warn_if_unclocked(offset);
        self.clock
            .execute_in_lock(|_| self.bank.read_double_word(&mut self.state, offset))
    }

    fn write_double_word(&mut self, offset: u32, value: u32) {
        self.warn_if_unclocked(offset);
        self.clock
            .execute_in_lock(|_| self.bank.write_double_word(&mut self.state, offset, value));
    }

    fn size(&self) -> u32 {
        HFXO_SIZE
    }

    fn reset(&mut self) {
        self.clock.execute_in_lock(|_| {
            self.bank.reset();
            self.state.reset(self.bank.file());
        });
    }
}

impl Tickable for Hfxo {
    fn tick(&mut self) {
        self.tick_n(Ticks::ONE);
    }

    fn tick_n(&mut self, count: Ticks) {
        self.clock.execute_in_lock(|now| {
            if self.state.timer.advance(count) {
                log::trace!("hfxo: start-up timer fired at {now}");
                self.state.startup_expired(self.bank.file_mut());
            }
        });
    }
}

impl Observable for Hfxo {
    fn query(&self, path: &str) -> Option<Value> {
        let state = &self.state;
        match path {
            "requester" => Some(Value::String(state.requester.name().to_string())),
            "force_enabled" => Some(state.force_enabled.into()),
            "on_demand_enabled" => Some(state.on_demand_enabled.into()),
            "irq" => Some(state.irq.is_asserted().into()),
            "timer.enabled" => Some(state.timer.is_enabled().into()),
            "timer.value" => Some(state.timer.value().into()),
            "timer.limit" => Some(state.timer.limit().into()),
            "core_bias.pending" => Some(state.core_bias.is_pending().into()),
            "core_bias.polls" => Some(state.core_bias.polls().into()),
            "static_violations" => Some(self.bank.static_violations().into()),
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
    use emu_core::MasterClock;

    struct AlwaysRequested;

    impl ClockManagement for AlwaysRequested {
        fn is_requested(&self) -> bool {
            true
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    fn make_hfxo() -> Hfxo {
        let clock = ClockSource::new(MasterClock::new(1_000_000));
        Hfxo::new(clock, Arc::new(AlwaysRequested), HfxoConfig::default()).expect("valid hfxo")
    }

    #[test]
    fn window_size() {
        assert_eq!(make_hfxo().size(), 0x4000);
    }

    #[test]
    fn on_demand_disabled_after_construction() {
        let mut hfxo = make_hfxo();
        assert_eq!(hfxo.query("on_demand_enabled"), Some(Value::Bool(false)));
        // HWREQ needs on-demand as well as a CMU request.
        assert_eq!(hfxo.read_double_word(registers::STATUS) & (1 << 17), 0);
    }

    #[test]
    fn construction_rejects_zero_rate() {
        let clock = ClockSource::new(MasterClock::new(1_000_000));
        let config = HfxoConfig {
            timer_frequency_hz: 0,
            startup_delay_ticks: 1,
        };
        assert!(matches!(
            Hfxo::new(clock, Arc::new(AlwaysRequested), config),
            Err(HfxoError::ZeroTimerFrequency)
        ));
    }

    #[test]
    fn hwreq_mux_reads_live_request() {
        let mut hfxo = make_hfxo();
        let hwreq = prs_status_sel::HWREQ << 8;
        hfxo.write_double_word(registers::CTRL + registers::SET_OFFSET, hwreq);
        assert!(!hfxo.prs_status_output(0));
        hfxo.write_double_word(registers::CTRL + registers::CLR_OFFSET, 1 << 24);
        assert!(hfxo.prs_status_output(0));
    }
}
