//! Live register values.

use std::collections::BTreeMap;

use crate::FieldRef;

/// The stored value of every register in a bank, keyed by offset.
///
/// Only offsets declared in the bank's layout exist; updates to any other
/// offset are dropped. Values never hold reserved bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    values: BTreeMap<u32, u32>,
}

impl RegisterFile {
    pub(crate) fn declare(&mut self, offset: u32, value: u32) {
        self.values.insert(offset, value);
    }

    #[must_use]
    pub fn contains(&self, offset: u32) -> bool {
        self.values.contains_key(&offset)
    }

    /// Stored value of the register at `offset` (0 if undeclared).
    #[must_use]
    pub fn get(&self, offset: u32) -> u32 {
        self.values.get(&offset).copied().unwrap_or(0)
    }

    pub fn set(&mut self, offset: u32, value: u32) {
        if let Some(slot) = self.values.get_mut(&offset) {
            *slot = value;
        }
    }

    #[must_use]
    pub fn field(&self, field: FieldRef) -> u32 {
        field.extract(self.get(field.offset))
    }

    pub fn set_field(&mut self, field: FieldRef, value: u32) {
        let updated = field.insert(self.get(field.offset), value);
        self.set(field.offset, updated);
    }

    #[must_use]
    pub fn flag(&self, field: FieldRef) -> bool {
        self.field(field) != 0
    }

    pub fn set_flag(&mut self, field: FieldRef, value: bool) {
        self.set_field(field, u32::from(value));
    }

    /// `(offset, value)` pairs in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.values.iter().map(|(&offset, &value)| (offset, value))
    }
}
