//! Level-triggered interrupt request line.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A single level-triggered IRQ output.
///
/// The device drives the level; the interrupt controller (or a test) holds a
/// clone and samples it. Rising edges are counted so a consumer can tell
/// that a pulse happened even if the level has since dropped.
#[derive(Debug, Clone, Default)]
pub struct IrqLine {
    inner: Arc<IrqState>,
}

#[derive(Debug, Default)]
struct IrqState {
    level: AtomicBool,
    rising_edges: AtomicU64,
}

impl IrqLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the line to `level`.
    pub fn set(&self, level: bool) {
        let previous = self.inner.level.swap(level, Ordering::AcqRel);
        if level && !previous {
            self.inner.rising_edges.fetch_add(1, Ordering::AcqRel);
        }
    }

    #[must_use]
    pub fn is_asserted(&self) -> bool {
        self.inner.level.load(Ordering::Acquire)
    }

    /// Number of low-to-high transitions since creation.
    #[must_use]
    pub fn rising_edges(&self) -> u64 {
        self.inner.rising_edges.load(Ordering::Acquire)
    }
}
