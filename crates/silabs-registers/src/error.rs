//! Register layout validation errors.

use thiserror::Error;

/// A register table that cannot describe real hardware.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{bank}: two registers at offset {offset:#05X}")]
    DuplicateOffset { bank: &'static str, offset: u32 },

    #[error("{bank}: register {register} at {offset:#X} is outside the 0x000-0xFFF window")]
    OffsetOutOfRange {
        bank: &'static str,
        register: &'static str,
        offset: u32,
    },

    #[error("{bank}: register {register} at {offset:#X} is not word aligned")]
    Misaligned {
        bank: &'static str,
        register: &'static str,
        offset: u32,
    },

    #[error("{register}.{field} has zero width")]
    ZeroWidth {
        register: &'static str,
        field: &'static str,
    },

    #[error("{register}.{field} (bits {shift}+{width}) extends past bit 31")]
    OutOfBounds {
        register: &'static str,
        field: &'static str,
        shift: u32,
        width: u32,
    },

    #[error("{register}.{first} overlaps {register}.{second}")]
    Overlap {
        register: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{register} has two fields named {field}")]
    DuplicateField {
        register: &'static str,
        field: &'static str,
    },

    #[error("{bank}: two registers named {register}")]
    DuplicateRegister {
        bank: &'static str,
        register: &'static str,
    },
}
