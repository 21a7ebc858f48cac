//! A 32-bit register: reset value plus an ordered set of fields.

use crate::field::{Access, Field};
use crate::{LayoutError, RegisterFile};

/// Runs after every field of a write has been processed.
///
/// Receives the register value before the write and the value as written
/// (before read-only and reserved bits were discarded).
pub type RegisterHook<C> = fn(&mut C, &mut RegisterFile, u32, u32);

/// One register of a peripheral.
pub struct Register<C> {
    pub(crate) name: &'static str,
    pub(crate) reset: u32,
    pub(crate) fields: Vec<Field<C>>,
    pub(crate) on_write: Option<RegisterHook<C>>,
}

impl<C> Register<C> {
    #[must_use]
    pub fn new(name: &'static str, reset: u32) -> Self {
        Self {
            name,
            reset,
            fields: Vec::new(),
            on_write: None,
        }
    }

    #[must_use]
    pub fn with(mut self, field: Field<C>) -> Self {
        self.fields.push(field);
        self
    }

    /// Mark every field added so far as static.
    #[must_use]
    pub fn static_config(mut self) -> Self {
        for field in &mut self.fields {
            field.is_static = true;
        }
        self
    }

    #[must_use]
    pub fn on_write(mut self, hook: RegisterHook<C>) -> Self {
        self.on_write = Some(hook);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[Field<C>] {
        &self.fields
    }

    /// Bits that read back a stored value: every field except write-only
    /// ones. Reserved bits are never in the mask.
    #[must_use]
    pub fn readable_mask(&self) -> u32 {
        self.fields
            .iter()
            .filter(|f| f.access != Access::WriteOnly)
            .fold(0, |mask, f| mask | f.mask())
    }

    /// Bits a bus write stores.
    #[must_use]
    pub fn writable_mask(&self) -> u32 {
        self.fields
            .iter()
            .filter(|f| f.access == Access::ReadWrite)
            .fold(0, |mask, f| mask | f.mask())
    }

    /// The value this register holds after reset.
    #[must_use]
    pub fn reset_value(&self) -> u32 {
        self.reset & self.readable_mask()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field<C>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sort fields into ascending bit order and check they fit together.
    pub(crate) fn validate(&mut self) -> Result<(), LayoutError> {
        self.fields.sort_by_key(|f| f.shift);

        for (i, field) in self.fields.iter().enumerate() {
            if field.width == 0 {
                return Err(LayoutError::ZeroWidth {
                    register: self.name,
                    field: field.name,
                });
            }
            if field.shift + field.width > 32 {
                return Err(LayoutError::OutOfBounds {
                    register: self.name,
                    field: field.name,
                    shift: field.shift,
                    width: field.width,
                });
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(LayoutError::DuplicateField {
                    register: self.name,
                    field: field.name,
                });
            }
        }

        for pair in self.fields.windows(2) {
            if pair[0].shift + pair[0].width > pair[1].shift {
                return Err(LayoutError::Overlap {
                    register: self.name,
                    first: pair[0].name,
                    second: pair[1].name,
                });
            }
        }
        Ok(())
    }
}
