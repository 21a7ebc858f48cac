//! Model state behind the CMU register hooks.

use std::sync::Arc;

use emu_core::IrqLine;
use silabs_registers::RegisterFile;

use crate::CmuSignals;
use crate::registers::{
    CLKEN0_HFXO0, EM01GRPACLKCTRL_CLKSEL, IEN, IF, SYSCLKCTRL_CLKSEL, em01grpa_sel, sysclk_sel,
};

pub(crate) struct CmuState {
    pub(crate) signals: Arc<CmuSignals>,
    /// SYSCLK was switched to the HFXO and the HFXO has not been told yet.
    pub(crate) pending_hfxo_selection: bool,
    pub(crate) irq: IrqLine,
}

impl CmuState {
    pub(crate) fn new() -> Self {
        Self {
            signals: Arc::new(CmuSignals::new()),
            pending_hfxo_selection: false,
            irq: IrqLine::new(),
        }
    }

    pub(crate) fn reset(&mut self, file: &RegisterFile) {
        self.pending_hfxo_selection = false;
        self.signals.clear_events();
        self.refresh(file);
        self.update_interrupts(file);
    }

    /// Re-derive the HFXO request and enable outputs from the clock tree.
    pub(crate) fn refresh(&self, file: &RegisterFile) {
        let grpa = file.field(EM01GRPACLKCTRL_CLKSEL);
        let requested = file.field(SYSCLKCTRL_CLKSEL) == sysclk_sel::HFXO
            || grpa == em01grpa_sel::HFXO
            || grpa == em01grpa_sel::HFXORT;
        self.signals.update(requested, file.flag(CLKEN0_HFXO0));
    }

    pub(crate) fn update_interrupts(&self, file: &RegisterFile) {
        self.irq.set(file.get(IF) & file.get(IEN) != 0);
    }
}
