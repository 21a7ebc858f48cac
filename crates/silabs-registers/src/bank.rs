//! Offset-addressed collection of registers bound to a device context.

use std::collections::BTreeMap;

use emu_core::Value;

use crate::field::Access;
use crate::{AliasOp, FieldKind, LayoutError, Register, RegisterFile, decode_aliased_address};

/// Reports whether the owning device is currently enabled. Static fields
/// changed while this returns `true` are logged as errors.
pub type EnabledProbe<C> = fn(&C, &RegisterFile) -> bool;

/// Collects a device's register table before validation.
pub struct RegisterBankBuilder<C> {
    name: &'static str,
    registers: Vec<(u32, Register<C>)>,
    enabled_probe: Option<EnabledProbe<C>>,
}

impl<C> RegisterBankBuilder<C> {
    #[must_use]
    pub fn register(mut self, offset: u32, register: Register<C>) -> Self {
        self.registers.push((offset, register));
        self
    }

    #[must_use]
    pub fn enabled_probe(mut self, probe: EnabledProbe<C>) -> Self {
        self.enabled_probe = Some(probe);
        self
    }

    /// Validate the table and load every register with its reset value.
    pub fn build(self) -> Result<RegisterBank<C>, LayoutError> {
        let bank = self.name;
        let mut registers: BTreeMap<u32, Register<C>> = BTreeMap::new();
        let mut file = RegisterFile::default();

        for (offset, mut register) in self.registers {
            if offset > 0xFFF {
                return Err(LayoutError::OffsetOutOfRange {
                    bank,
                    register: register.name,
                    offset,
                });
            }
            if offset % 4 != 0 {
                return Err(LayoutError::Misaligned {
                    bank,
                    register: register.name,
                    offset,
                });
            }
            if registers.contains_key(&offset) {
                return Err(LayoutError::DuplicateOffset { bank, offset });
            }
            if registers.values().any(|r| r.name == register.name) {
                return Err(LayoutError::DuplicateRegister {
                    bank,
                    register: register.name,
                });
            }
            register.validate()?;
            file.declare(offset, register.reset_value());
            registers.insert(offset, register);
        }

        Ok(RegisterBank {
            name: bank,
            registers,
            file,
            enabled_probe: self.enabled_probe,
            static_violations: 0,
        })
    }
}

/// A device's registers and their live values.
///
/// `C` is the device state the field hooks operate on. The bank never owns
/// it; every access borrows it for the duration of the call.
pub struct RegisterBank<C> {
    name: &'static str,
    registers: BTreeMap<u32, Register<C>>,
    file: RegisterFile,
    enabled_probe: Option<EnabledProbe<C>>,
    /// Static fields changed while the device was enabled, since reset.
    static_violations: u64,
}

impl<C> RegisterBank<C> {
    #[must_use]
    pub fn builder(name: &'static str) -> RegisterBankBuilder<C> {
        RegisterBankBuilder {
            name,
            registers: Vec::new(),
            enabled_probe: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn file(&self) -> &RegisterFile {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut RegisterFile {
        &mut self.file
    }

    #[must_use]
    pub fn register(&self, offset: u32) -> Option<&Register<C>> {
        self.registers.get(&offset)
    }

    #[must_use]
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.registers
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(&offset, _)| offset)
    }

    /// Map a bus address to the register offset to access and the window
    /// operation. Addresses whose base offset names no register fall back
    /// to `address & 0xFFF`.
    #[must_use]
    pub fn resolve(&self, address: u32) -> (u32, AliasOp) {
        let (base, op) = decode_aliased_address(address);
        if self.registers.contains_key(&base) {
            return (base, op);
        }
        let fallback = address & 0xFFF;
        if fallback != base {
            log::warn!(
                "{}: no register at {address:#06X}, falling back to {fallback:#05X}",
                self.name
            );
        }
        (fallback, op)
    }

    /// Bus read: decode the alias window, then read the base register.
    pub fn read_double_word(&mut self, ctx: &mut C, address: u32) -> u32 {
        let (offset, op) = self.resolve(address);
        if op != AliasOp::Direct {
            log::warn!(
                "{}: reading through the {} window at {address:#06X} is not supported, reading {offset:#05X}",
                self.name,
                op.name()
            );
        }
        self.read(ctx, offset)
    }

    /// Bus write: decode the alias window and compose SET/CLR/TGL against
    /// the stored value, then write the base register.
    pub fn write_double_word(&mut self, ctx: &mut C, address: u32, value: u32) {
        let (offset, op) = self.resolve(address);
        let composed = op.apply(self.file.get(offset), value);
        if op != AliasOp::Direct {
            log::trace!(
                "{}: {} {value:#010X} at {offset:#05X} -> {composed:#010X}",
                self.name,
                op.name()
            );
        }
        self.write(ctx, offset, composed);
    }

    /// Read the register at `offset`.
    ///
    /// Fields are visited in ascending bit order: the value provider
    /// refreshes the stored value, then the read hook sees it. Write-only
    /// fields and reserved bits read as 0.
    pub fn read(&mut self, ctx: &mut C, offset: u32) -> u32 {
        let Some(register) = self.registers.get(&offset) else {
            log::warn!("{}: read from unknown offset {offset:#05X}", self.name);
            return 0;
        };

        let mut result = 0;
        for field in &register.fields {
            if field.access == Access::WriteOnly {
                continue;
            }
            let mut value = field.extract(self.file.get(offset));
            if let Some(provider) = field.provider {
                let stored = field.insert(self.file.get(offset), provider(ctx, &self.file, value));
                self.file.set(offset, stored);
                value = field.extract(stored);
            }
            if let Some(hook) = field.on_read {
                hook(ctx, &mut self.file, value);
            }
            result = field.insert(result, value);
        }

        log::trace!("{}: read {} = {result:#010X}", self.name, register.name);
        result
    }

    /// Write the register at `offset`.
    ///
    /// Every read-write slice is stored first, then write hooks run in
    /// ascending bit order with `(old, new)`, so a hook sees the whole
    /// register as written. Read-only fields are skipped entirely;
    /// write-only fields reach their hook but are not stored. The
    /// register-level hook runs last.
    pub fn write(&mut self, ctx: &mut C, offset: u32, value: u32) {
        let Some(register) = self.registers.get(&offset) else {
            log::warn!(
                "{}: write {value:#010X} to unknown offset {offset:#05X} dropped",
                self.name
            );
            return;
        };
        log::trace!("{}: write {} = {value:#010X}", self.name, register.name);

        let enabled = self
            .enabled_probe
            .is_some_and(|probe| probe(ctx, &self.file));
        let old = self.file.get(offset);
        let writable = register.writable_mask();
        self.file.set(offset, (old & !writable) | (value & writable));

        for field in &register.fields {
            let before = field.extract(old);
            let written = field.extract(value);
            match field.access {
                Access::ReadOnly => continue,
                Access::ReadWrite if field.is_static && enabled && before != written => {
                    self.static_violations += 1;
                    log::error!(
                        "{}: {}.{} changed from {before:#X} to {written:#X} while the device is enabled",
                        self.name,
                        register.name,
                        field.name
                    );
                }
                _ => {}
            }
            if let Some(hook) = field.on_write {
                hook(ctx, &mut self.file, before, written);
            }
        }

        if let Some(hook) = register.on_write {
            hook(ctx, &mut self.file, old, value);
        }
    }

    /// Restore every register to its reset value. Runs no hooks.
    pub fn reset(&mut self) {
        for (&offset, register) in &self.registers {
            self.file.set(offset, register.reset_value());
        }
        self.static_violations = 0;
    }

    /// How many writes changed a static field while the device was enabled.
    #[must_use]
    pub fn static_violations(&self) -> u64 {
        self.static_violations
    }

    /// `(offset, stored value)` for every register, in offset order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(u32, u32)> {
        self.file.iter().collect()
    }

    /// Look up `REG` or `REG.FIELD` without running providers or hooks.
    #[must_use]
    pub fn query(&self, path: &str) -> Option<Value> {
        let (register_name, field_name) = match path.split_once('.') {
            Some((register, field)) => (register, Some(field)),
            None => (path, None),
        };
        let offset = self.offset_of(register_name)?;
        let register = self.registers.get(&offset)?;
        let stored = self.file.get(offset);

        let Some(field_name) = field_name else {
            return Some(Value::U32(stored));
        };
        let field = register.field(field_name)?;
        let value = if field.access == Access::WriteOnly {
            0
        } else {
            field.extract(stored)
        };
        Some(match field.kind {
            FieldKind::Flag => Value::Bool(value != 0),
            FieldKind::Value => Value::U32(value),
            FieldKind::Enum(_) => Value::Enum {
                code: value,
                name: field.code_name(value),
            },
        })
    }

    /// Every `REG` and `REG.FIELD` path accepted by [`query`](Self::query).
    #[must_use]
    pub fn query_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for register in self.registers.values() {
            paths.push(register.name.to_string());
            for field in &register.fields {
                paths.push(format!("{}.{}", register.name, field.name));
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, FieldRef};

    #[derive(Default)]
    struct Probe {
        writes: Vec<(u32, u32)>,
        polls: u32,
        enabled: bool,
    }

    const STATUS_BUSY: FieldRef = FieldRef::flag(0x8, 0);

    fn record_write(ctx: &mut Probe, _: &mut RegisterFile, old: u32, new: u32) {
        ctx.writes.push((old, new));
    }

    fn count_polls(ctx: &mut Probe, _: &RegisterFile, _: u32) -> u32 {
        ctx.polls += 1;
        ctx.polls
    }

    fn set_busy(_: &mut Probe, file: &mut RegisterFile, _: u32, new: u32) {
        if new != 0 {
            file.set_flag(STATUS_BUSY, true);
        }
    }

    fn bank() -> RegisterBank<Probe> {
        RegisterBank::builder("probe")
            .register(
                0x0,
                Register::new("CTRL", 0x0000_0F01)
                    .with(Field::flag(0, "EN").on_write(record_write))
                    .with(Field::value(8, 4, "SEL").static_config()),
            )
            .register(
                0x4,
                Register::new("CMD", 0).with(Field::flag(0, "START").write_only().on_write(set_busy)),
            )
            .register(
                0x8,
                Register::new("STATUS", 0)
                    .with(Field::flag(0, "BUSY").read_only())
                    .with(Field::value(4, 4, "POLLS").read_only().provider(count_polls)),
            )
            .enabled_probe(|ctx, _| ctx.enabled)
            .build()
            .expect("valid layout")
    }

    #[test]
    fn reset_values_loaded() {
        let bank = bank();
        assert_eq!(bank.file().get(0x0), 0x0000_0F01);
        assert_eq!(bank.snapshot(), vec![(0x0, 0xF01), (0x4, 0), (0x8, 0)]);
    }

    #[test]
    fn write_hooks_see_old_and_new() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        bank.write(&mut ctx, 0x0, 0x0000_0300);
        assert_eq!(ctx.writes, vec![(1, 0)]);
        assert_eq!(bank.file().get(0x0), 0x300);
    }

    #[test]
    fn write_only_reaches_hook_but_not_storage() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        bank.write(&mut ctx, 0x4, 1);
        assert_eq!(bank.file().get(0x4), 0);
        assert_eq!(bank.read(&mut ctx, 0x4), 0);
        assert!(bank.file().flag(STATUS_BUSY));
    }

    #[test]
    fn read_only_ignores_bus_writes() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        bank.write(&mut ctx, 0x8, 0xFFFF_FFFF);
        assert_eq!(bank.file().get(0x8), 0);
    }

    #[test]
    fn provider_refreshes_on_every_read() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        assert_eq!(bank.read(&mut ctx, 0x8), 0x10);
        assert_eq!(bank.read(&mut ctx, 0x8), 0x20);
        assert_eq!(bank.file().get(0x8), 0x20);
    }

    #[test]
    fn query_does_not_run_providers() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        bank.read(&mut ctx, 0x8);
        assert_eq!(bank.query("STATUS.POLLS"), Some(Value::U32(1)));
        assert_eq!(bank.query("STATUS.POLLS"), Some(Value::U32(1)));
        assert_eq!(ctx.polls, 1);
        assert_eq!(bank.query("CTRL.EN"), Some(Value::Bool(true)));
        assert_eq!(bank.query("CTRL.NOPE"), None);
        assert!(bank.query_paths().contains(&"CMD.START".to_string()));
    }

    #[test]
    fn static_field_change_counted_only_while_enabled() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        bank.write(&mut ctx, 0x0, 0x0000_0301);
        assert_eq!(bank.static_violations(), 0);

        ctx.enabled = true;
        // Same SEL value: not a change.
        bank.write(&mut ctx, 0x0, 0x0000_0300);
        assert_eq!(bank.static_violations(), 0);
        bank.write(&mut ctx, 0x0, 0x0000_0500);
        assert_eq!(bank.static_violations(), 1);
        // The write is still applied.
        assert_eq!(bank.file().get(0x0), 0x500);

        bank.reset();
        assert_eq!(bank.static_violations(), 0);
    }

    #[test]
    fn unknown_offsets_read_zero_and_drop_writes() {
        let mut ctx = Probe::default();
        let mut bank = bank();
        assert_eq!(bank.read(&mut ctx, 0x40), 0);
        bank.write(&mut ctx, 0x40, 0xFFFF);
        assert_eq!(bank.snapshot().len(), 3);
    }

    #[test]
    fn resolve_falls_back_to_low_bits() {
        let bank = bank();
        assert_eq!(bank.resolve(0x1004), (0x4, AliasOp::Set));
        assert_eq!(bank.resolve(0x4008), (0x8, AliasOp::Direct));
    }

    #[test]
    fn rejects_duplicate_offset() {
        let result = RegisterBank::<()>::builder("dup")
            .register(0x10, Register::new("A", 0))
            .register(0x10, Register::new("B", 0))
            .build();
        assert!(matches!(result, Err(LayoutError::DuplicateOffset { offset: 0x10, .. })));
    }

    #[test]
    fn rejects_offsets_outside_window() {
        let far = RegisterBank::<()>::builder("far")
            .register(0x1000, Register::new("A", 0))
            .build();
        assert!(matches!(far, Err(LayoutError::OffsetOutOfRange { .. })));

        let odd = RegisterBank::<()>::builder("odd")
            .register(0x2, Register::new("A", 0))
            .build();
        assert!(matches!(odd, Err(LayoutError::Misaligned { .. })));
    }
}
