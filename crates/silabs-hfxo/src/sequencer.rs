//! Enable and start-up state machine.
//!
//! Everything here runs with the clock source lock held: the public
//! entry points in `hfxo.rs` take it once and call down.

use std::fmt;
use std::sync::Arc;

use emu_core::{IrqLine, LimitTimer};
use silabs_registers::RegisterFile;

use crate::registers::{
    CTRL_DISONDEMAND, CTRL_FORCEEN, IEN_PRSRDY, IEN_RDY, IF_COREBIASOPTRDY, IF_PRSRDY, IF_RDY,
    STATUS_COREBIASOPTRDY, STATUS_ENS, STATUS_PRSHWREQ, STATUS_PRSRDY, STATUS_RDY,
    XTALCTRL_COREBIASANA, XTALCTRL_SKIPCOREBIASOPT,
};
use crate::{ClockManagement, CoreBiasCalibration};

/// Who started the oscillator that is currently starting up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WakeupRequester {
    #[default]
    None,
    /// PRS early wake-up; completes when the CMU selects the HFXO.
    Prs,
    /// `CTRL.FORCEEN`.
    Force,
}

impl WakeupRequester {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WakeupRequester::None => "none",
            WakeupRequester::Prs => "prs",
            WakeupRequester::Force => "force",
        }
    }
}

impl fmt::Display for WakeupRequester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) type Listener = Box<dyn FnMut() + Send>;

/// Model state the register hooks operate on.
pub(crate) struct HfxoState {
    /// Ready because forced; cleared when the oscillator goes idle.
    pub(crate) force_enabled: bool,
    /// `!CTRL.DISONDEMAND`.
    pub(crate) on_demand_enabled: bool,
    pub(crate) requester: WakeupRequester,
    pub(crate) timer: LimitTimer,
    pub(crate) startup_delay: u64,
    pub(crate) core_bias: CoreBiasCalibration,
    pub(crate) cmu: Arc<dyn ClockManagement>,
    pub(crate) irq: IrqLine,
    pub(crate) listeners: Vec<Listener>,
}

impl HfxoState {
    pub(crate) fn new(timer: LimitTimer, startup_delay: u64, cmu: Arc<dyn ClockManagement>) -> Self {
        Self {
            force_enabled: false,
            on_demand_enabled: false,
            requester: WakeupRequester::None,
            timer,
            startup_delay,
            core_bias: CoreBiasCalibration::default(),
            cmu,
            irq: IrqLine::new(),
            listeners: Vec::new(),
        }
    }

    /// Back to idle. Listeners stay registered.
    pub(crate) fn reset(&mut self, file: &RegisterFile) {
        self.force_enabled = false;
        self.on_demand_enabled = !file.flag(CTRL_DISONDEMAND);
        self.requester = WakeupRequester::None;
        self.timer.disable();
        self.core_bias.cancel();
        self.irq.set(false);
    }

    /// Idle: no start-up in progress and the oscillator is off.
    pub(crate) fn is_idle(&self, file: &RegisterFile) -> bool {
        self.requester == WakeupRequester::None && !file.flag(STATUS_ENS)
    }

    pub(crate) fn is_requested_on_demand(&self) -> bool {
        self.on_demand_enabled && self.cmu.is_requested()
    }

    fn restart_timer(&mut self) {
        self.timer.restart(self.startup_delay);
    }

    /// `CTRL.FORCEEN` went 0→1.
    pub(crate) fn start_forced(&mut self, file: &mut RegisterFile) {
        log::debug!("hfxo: forced start-up, {} timer ticks", self.startup_delay);
        file.set_flag(STATUS_COREBIASOPTRDY, false);
        file.set_flag(STATUS_ENS, true);
        self.requester = WakeupRequester::Force;
        self.restart_timer();
    }

    /// PRS early wake-up request.
    pub(crate) fn early_wakeup(&mut self, file: &mut RegisterFile) {
        if !self.is_idle(file) {
            log::debug!(
                "hfxo: PRS wake-up ignored, oscillator busy (requester {})",
                self.requester
            );
            return;
        }
        log::debug!("hfxo: PRS start-up, {} timer ticks", self.startup_delay);
        self.requester = WakeupRequester::Prs;
        file.set_flag(STATUS_PRSHWREQ, true);
        file.set_flag(STATUS_ENS, true);
        self.restart_timer();
        for listener in &mut self.listeners {
            listener();
        }
        file.set_flag(STATUS_PRSHWREQ, false);
    }

    /// The start-up timer reached its limit.
    pub(crate) fn startup_expired(&mut self, file: &mut RegisterFile) {
        log::debug!("hfxo: start-up timer expired (requester {})", self.requester);
        match self.requester {
            WakeupRequester::Force => {
                // FORCEEN may have dropped while on-demand kept the start-up going.
                self.force_enabled = file.flag(CTRL_FORCEEN);
                self.requester = WakeupRequester::None;
                file.set_flag(STATUS_RDY, true);
                file.set_flag(STATUS_COREBIASOPTRDY, true);
                file.set_flag(IF_RDY, true);
            }
            WakeupRequester::Prs => {
                file.set_flag(STATUS_PRSRDY, true);
                file.set_flag(IF_PRSRDY, true);
            }
            WakeupRequester::None => {
                log::warn!("hfxo: start-up timer expired with no requester");
            }
        }
        self.update_interrupts(file);
    }

    /// The CMU switched a clock tree branch onto the HFXO.
    pub(crate) fn selected_as_clock_source(&mut self, file: &mut RegisterFile) {
        let requester = self.requester;
        if requester == WakeupRequester::None {
            log::debug!("hfxo: selected as clock source with no start-up pending");
            return;
        }
        if requester == WakeupRequester::Prs && !file.flag(STATUS_PRSRDY) {
            log::debug!("hfxo: selected as clock source before the PRS start-up delay elapsed, ignored");
            return;
        }
        log::debug!("hfxo: selected as clock source (requester {requester})");
        self.requester = WakeupRequester::None;
        self.timer.disable();
        file.set_flag(STATUS_RDY, true);
        file.set_flag(IF_RDY, true);
        file.set_flag(STATUS_PRSRDY, false);
        if requester == WakeupRequester::Force {
            self.force_enabled = file.flag(CTRL_FORCEEN);
        }
        self.update_interrupts(file);
    }

    /// Turn the oscillator off unless something still needs it.
    pub(crate) fn disable_if_unused(&mut self, file: &mut RegisterFile) {
        self.on_demand_enabled = !file.flag(CTRL_DISONDEMAND);
        let in_use = file.flag(CTRL_FORCEEN)
            || self.is_requested_on_demand()
            || self.requester == WakeupRequester::Prs;
        if in_use {
            if !file.flag(CTRL_FORCEEN) {
                self.force_enabled = false;
            }
            return;
        }
        if file.flag(STATUS_ENS) || self.timer.is_enabled() {
            log::debug!("hfxo: disabled");
        }
        self.timer.disable();
        self.requester = WakeupRequester::None;
        self.force_enabled = false;
        file.set_flag(STATUS_RDY, false);
        file.set_flag(STATUS_PRSRDY, false);
        file.set_flag(STATUS_ENS, false);
        file.set_flag(STATUS_COREBIASOPTRDY, false);
    }

    /// `CMD.COREBIASOPT` written.
    pub(crate) fn start_core_bias_optimisation(&mut self, file: &mut RegisterFile) {
        if file.flag(XTALCTRL_SKIPCOREBIASOPT) {
            self.core_bias.cancel();
            file.set_flag(STATUS_COREBIASOPTRDY, true);
            file.set_flag(IF_COREBIASOPTRDY, true);
            return;
        }
        let current = file.field(XTALCTRL_COREBIASANA);
        let target = CoreBiasCalibration::target(current);
        log::debug!("hfxo: core bias optimisation {current:#05X} -> {target:#05X}");
        file.set_field(XTALCTRL_COREBIASANA, target);
        file.set_flag(STATUS_COREBIASOPTRDY, false);
        self.core_bias.start();
    }

    /// Drive the IRQ line from the ready and PRS-ready interrupt pairs.
    pub(crate) fn update_interrupts(&self, file: &RegisterFile) {
        let ready = file.flag(IEN_RDY) && file.flag(IF_RDY);
        let prs_ready = file.flag(IEN_PRSRDY) && file.flag(IF_PRSRDY);
        self.irq.set(ready || prs_ready);
    }
}
