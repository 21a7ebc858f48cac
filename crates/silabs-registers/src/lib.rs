//! Register banks for Silicon Labs series-2 peripherals.
//!
//! A peripheral describes its registers once, as a table of [`Register`]s
//! built from typed [`Field`]s, and hands the table to
//! [`RegisterBank::builder`]. The bank then does all bus-side decoding:
//!
//! - address → register, including the SET/CLR/TGL alias windows
//!   ([`decode_aliased_address`]);
//! - register → fields, honouring read-only, write-only and reserved bits;
//! - per-field hooks into the owning device: value providers run before a
//!   read exposes a field, read and write hooks run as side effects.
//!
//! # Address windows
//!
//! | Window   | Offset    | Write effect            | Read   |
//! |----------|-----------|-------------------------|--------|
//! | Direct   | `+0x0000` | store value             | normal |
//! | SET      | `+0x1000` | stored \| value          | warns  |
//! | CLR      | `+0x2000` | stored & !value         | warns  |
//! | TGL      | `+0x3000` | stored ^ value          | warns  |
//!
//! Hooks receive the device context `C` and the live [`RegisterFile`]
//! separately, so a hook on one field may update any other register.

mod alias;
mod bank;
mod error;
mod field;
mod file;
mod register;

pub use alias::{AliasOp, decode_aliased_address};
pub use bank::{EnabledProbe, RegisterBank, RegisterBankBuilder};
pub use error::LayoutError;
pub use field::{Access, Field, FieldKind, FieldRef, ReadHook, ValueProvider, WriteHook};
pub use file::RegisterFile;
pub use register::{Register, RegisterHook};
