//! Typed bit fields and the hooks a device attaches to them.

use crate::RegisterFile;

/// Computes a field's live value just before a read exposes it.
///
/// Receives the device context, the register file and the stored field
/// value; returns the value to expose and store.
pub type ValueProvider<C> = fn(&mut C, &RegisterFile, u32) -> u32;

/// Side effect of reading a field. Receives the value that was read.
pub type ReadHook<C> = fn(&mut C, &mut RegisterFile, u32);

/// Side effect of writing a field. Receives the old and the written value.
pub type WriteHook<C> = fn(&mut C, &mut RegisterFile, u32, u32);

/// How a field's bits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single bit.
    Flag,
    /// Unsigned integer.
    Value,
    /// Integer with named codes. Unnamed codes are still stored.
    Enum(&'static [(&'static str, u32)]),
}

/// Bus access permitted on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Writes are ignored. The model updates the value through the
    /// register file or a value provider.
    ReadOnly,
    /// Reads return 0; the written value only reaches the write hook.
    WriteOnly,
}

/// One bit field of a register.
pub struct Field<C> {
    pub(crate) name: &'static str,
    pub(crate) shift: u32,
    pub(crate) width: u32,
    pub(crate) kind: FieldKind,
    pub(crate) access: Access,
    pub(crate) is_static: bool,
    pub(crate) provider: Option<ValueProvider<C>>,
    pub(crate) on_read: Option<ReadHook<C>>,
    pub(crate) on_write: Option<WriteHook<C>>,
}

impl<C> Field<C> {
    fn new(shift: u32, width: u32, kind: FieldKind, name: &'static str) -> Self {
        Self {
            name,
            shift,
            width,
            kind,
            access: Access::ReadWrite,
            is_static: false,
            provider: None,
            on_read: None,
            on_write: None,
        }
    }

    /// Single-bit read-write field.
    #[must_use]
    pub fn flag(shift: u32, name: &'static str) -> Self {
        Self::new(shift, 1, FieldKind::Flag, name)
    }

    /// Multi-bit read-write integer field.
    #[must_use]
    pub fn value(shift: u32, width: u32, name: &'static str) -> Self {
        Self::new(shift, width, FieldKind::Value, name)
    }

    /// Multi-bit read-write field with named codes.
    #[must_use]
    pub fn enumeration(
        shift: u32,
        width: u32,
        name: &'static str,
        codes: &'static [(&'static str, u32)],
    ) -> Self {
        Self::new(shift, width, FieldKind::Enum(codes), name)
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    #[must_use]
    pub fn write_only(mut self) -> Self {
        self.access = Access::WriteOnly;
        self
    }

    /// Mark the field as one the hardware expects to be changed only while
    /// the device is disabled.
    #[must_use]
    pub fn static_config(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: ValueProvider<C>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn on_read(mut self, hook: ReadHook<C>) -> Self {
        self.on_read = Some(hook);
        self
    }

    #[must_use]
    pub fn on_write(mut self, hook: WriteHook<C>) -> Self {
        self.on_write = Some(hook);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }

    pub(crate) const fn mask(&self) -> u32 {
        field_mask(self.shift, self.width)
    }

    pub(crate) const fn extract(&self, register: u32) -> u32 {
        (register & self.mask()) >> self.shift
    }

    pub(crate) const fn insert(&self, register: u32, value: u32) -> u32 {
        (register & !self.mask()) | ((value << self.shift) & self.mask())
    }

    /// Name of `code` if this is an enumerated field that names it.
    pub(crate) fn code_name(&self, code: u32) -> Option<&'static str> {
        match self.kind {
            FieldKind::Enum(codes) => codes.iter().find(|(_, c)| *c == code).map(|(n, _)| *n),
            _ => None,
        }
    }
}

/// Location of a field inside a [`RegisterFile`].
///
/// Device code keeps these as constants and uses them from hooks and state
/// transitions to read and update fields of any register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub offset: u32,
    pub shift: u32,
    pub width: u32,
}

impl FieldRef {
    #[must_use]
    pub const fn flag(offset: u32, shift: u32) -> Self {
        Self {
            offset,
            shift,
            width: 1,
        }
    }

    #[must_use]
    pub const fn value(offset: u32, shift: u32, width: u32) -> Self {
        Self {
            offset,
            shift,
            width,
        }
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        field_mask(self.shift, self.width)
    }

    #[must_use]
    pub const fn extract(self, register: u32) -> u32 {
        (register & self.mask()) >> self.shift
    }

    #[must_use]
    pub const fn insert(self, register: u32, value: u32) -> u32 {
        (register & !self.mask()) | ((value << self.shift) & self.mask())
    }
}

pub(crate) const fn field_mask(shift: u32, width: u32) -> u32 {
    if width == 0 || shift >= 32 {
        0
    } else if width >= 32 {
        u32::MAX << shift
    } else {
        ((1u32 << width) - 1) << shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(field_mask(0, 1), 0x1);
        assert_eq!(field_mask(4, 4), 0xF0);
        assert_eq!(field_mask(0, 32), u32::MAX);
        assert_eq!(field_mask(31, 1), 0x8000_0000);
        assert_eq!(field_mask(3, 0), 0);
    }

    #[test]
    fn field_ref_insert_and_extract() {
        let sel = FieldRef::value(0x30, 8, 4);
        let reg = sel.insert(0xFFFF_FFFF, 0x3);
        assert_eq!(reg, 0xFFFF_F3FF);
        assert_eq!(sel.extract(reg), 0x3);
        // Out-of-range value bits are dropped.
        assert_eq!(sel.insert(0, 0x1F), 0xF00);
    }

    #[test]
    fn enumeration_names_codes() {
        const LOCK: &[(&str, u32)] = &[("UNLOCKED", 0), ("LOCKED", 1)];
        let field: Field<()> = Field::enumeration(31, 1, "LOCK", LOCK).read_only();
        assert_eq!(field.code_name(1), Some("LOCKED"));
        assert_eq!(field.code_name(2), None);
        assert_eq!(field.access(), Access::ReadOnly);
    }
}
