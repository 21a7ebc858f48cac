//! Peripheral address decoding.

use silabs_cmu::CMU_SIZE;
use silabs_hfxo::HFXO_SIZE;

use crate::MachineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cmu,
    Hfxo,
}

impl Device {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Device::Cmu => "cmu",
            Device::Hfxo => "hfxo",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AddressMap {
    cmu_base: u32,
    hfxo_base: u32,
}

impl AddressMap {
    pub(crate) fn new(config: &MachineConfig) -> Self {
        Self {
            cmu_base: config.cmu_base,
            hfxo_base: config.hfxo_base,
        }
    }

    /// Device and window offset for a bus address.
    pub(crate) fn decode(&self, address: u32) -> Option<(Device, u32)> {
        let within = |base: u32, size: u32| {
            address
                .checked_sub(base)
                .filter(|offset| *offset < size)
        };
        if let Some(offset) = within(self.cmu_base, CMU_SIZE) {
            return Some((Device::Cmu, offset));
        }
        within(self.hfxo_base, HFXO_SIZE).map(|offset| (Device::Hfxo, offset))
    }

    pub(crate) fn base(&self, device: Device) -> u32 {
        match device {
            Device::Cmu => self.cmu_base,
            Device::Hfxo => self.hfxo_base,
        }
    }
}
