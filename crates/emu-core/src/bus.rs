//! Memory-mapped peripheral interface.

/// A peripheral accessed through 32-bit loads and stores.
///
/// The bus fabric decodes the peripheral's base address and hands it the
/// offset inside its window. Accesses never fail: anomalous offsets are a
/// guest bug and the peripheral logs and falls back instead of faulting.
pub trait DoubleWordPeripheral {
    /// Read the 32-bit word at `offset` (relative to the peripheral base).
    fn read_double_word(&mut self, offset: u32) -> u32;

    /// Write the 32-bit word at `offset` (relative to the peripheral base).
    fn write_double_word(&mut self, offset: u32, value: u32);

    /// Size of the address window in bytes.
    fn size(&self) -> u32;

    /// Return to the power-on state.
    fn reset(&mut self);
}
