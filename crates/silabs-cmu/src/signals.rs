//! Clock tree state the HFXO samples without going through the bus.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use silabs_hfxo::ClockManagement;

/// Shared view of the CMU's HFXO-related outputs.
///
/// The CMU refreshes these after every register write; the HFXO holds an
/// `Arc` and reads them from its own hooks.
#[derive(Debug, Default)]
pub struct CmuSignals {
    hfxo_requested: AtomicBool,
    hfxo_enabled: AtomicBool,
    hfxo_enable_events: AtomicU64,
}

impl CmuSignals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&self, requested: bool, enabled: bool) {
        let was_requested = self.hfxo_requested.swap(requested, Ordering::AcqRel);
        let was_enabled = self.hfxo_enabled.swap(enabled, Ordering::AcqRel);
        if was_requested != requested {
            log::debug!("cmu: HFXO request {}", if requested { "raised" } else { "dropped" });
        }
        if was_enabled != enabled {
            log::debug!("cmu: HFXO bus clock {}", if enabled { "on" } else { "off" });
        }
    }

    /// Count one HFXO start-up reported through its enable listener.
    pub fn record_hfxo_enable(&self) {
        self.hfxo_enable_events.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn hfxo_enable_events(&self) -> u64 {
        self.hfxo_enable_events.load(Ordering::Relaxed)
    }

    pub(crate) fn clear_events(&self) {
        self.hfxo_enable_events.store(0, Ordering::Relaxed);
    }
}

impl ClockManagement for CmuSignals {
    fn is_requested(&self) -> bool {
        self.hfxo_requested.load(Ordering::Acquire)
    }

    fn is_enabled(&self) -> bool {
        self.hfxo_enabled.load(Ordering::Acquire)
    }
}
