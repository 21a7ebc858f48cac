//! Trait for components that can be advanced by clock ticks.

use crate::Ticks;

/// A component that can be advanced by master clock ticks.
///
/// Peripherals with timers implement this so the machine can drive them
/// from one place. Components running at a lower rate divide internally.
pub trait Tickable {
    /// Advance the component by one master clock tick.
    fn tick(&mut self);

    /// Advance the component by multiple ticks.
    ///
    /// Default implementation calls `tick()` in a loop. Components may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
