//! CMU register map: the subset of the clock tree the HFXO depends on.

use silabs_registers::{Field, FieldRef, LayoutError, Register, RegisterBank, RegisterFile};

use crate::CmuConfig;
use crate::state::CmuState;

pub const IPVERSION: u32 = 0x000;
pub const CTRL: u32 = 0x004;
pub const STATUS: u32 = 0x008;
pub const LOCK: u32 = 0x010;
pub const IF: u32 = 0x020;
pub const IEN: u32 = 0x024;
pub const CLKEN0: u32 = 0x064;
pub const SYSCLKCTRL: u32 = 0x070;
pub const EM01GRPACLKCTRL: u32 = 0x120;

pub const SET_OFFSET: u32 = 0x1000;
pub const CLR_OFFSET: u32 = 0x2000;
pub const TGL_OFFSET: u32 = 0x3000;

/// `LOCK.LOCKKEY` value that unlocks the configuration registers.
pub const UNLOCK_KEY: u32 = 0x93F7;

pub const STATUS_CALRDY: FieldRef = FieldRef::flag(STATUS, 0);
pub const STATUS_LOCK: FieldRef = FieldRef::flag(STATUS, 31);

pub const IF_CALRDY: FieldRef = FieldRef::flag(IF, 0);
pub const IF_CALOF: FieldRef = FieldRef::flag(IF, 1);

pub const CLKEN0_HFXO0: FieldRef = FieldRef::flag(CLKEN0, 20);

pub const SYSCLKCTRL_CLKSEL: FieldRef = FieldRef::value(SYSCLKCTRL, 0, 3);
pub const EM01GRPACLKCTRL_CLKSEL: FieldRef = FieldRef::value(EM01GRPACLKCTRL, 0, 3);

pub const LOCK_UNLOCKED: u32 = 0;
pub const LOCK_LOCKED: u32 = 1;

/// `SYSCLKCTRL.CLKSEL` codes.
pub mod sysclk_sel {
    pub const FSRCO: u32 = 1;
    pub const HFRCODPLL: u32 = 2;
    pub const HFXO: u32 = 3;
    pub const CLKIN0: u32 = 4;
    pub const SOCPLL: u32 = 5;
}

/// `EM01GRPACLKCTRL.CLKSEL` codes.
pub mod em01grpa_sel {
    pub const DISABLED: u32 = 0;
    pub const HFRCODPLL: u32 = 1;
    pub const HFXO: u32 = 2;
    pub const FSRCO: u32 = 3;
    pub const HFRCOEM23: u32 = 4;
    pub const HFRCODPLLRT: u32 = 5;
    pub const HFXORT: u32 = 6;
}

const SYSCLK_SEL: &[(&str, u32)] = &[
    ("FSRCO", sysclk_sel::FSRCO),
    ("HFRCODPLL", sysclk_sel::HFRCODPLL),
    ("HFXO", sysclk_sel::HFXO),
    ("CLKIN0", sysclk_sel::CLKIN0),
    ("SOCPLL", sysclk_sel::SOCPLL),
];

const EM01GRPA_SEL: &[(&str, u32)] = &[
    ("DISABLED", em01grpa_sel::DISABLED),
    ("HFRCODPLL", em01grpa_sel::HFRCODPLL),
    ("HFXO", em01grpa_sel::HFXO),
    ("FSRCO", em01grpa_sel::FSRCO),
    ("HFRCOEM23", em01grpa_sel::HFRCOEM23),
    ("HFRCODPLLRT", em01grpa_sel::HFRCODPLLRT),
    ("HFXORT", em01grpa_sel::HFXORT),
];

const LSPCLKPRESC: &[(&str, u32)] = &[("DIV2", 0), ("DIV1", 1), ("DIV4", 3)];
const PCLKPRESC: &[(&str, u32)] = &[("DIV1", 0), ("DIV2", 1)];
const HCLKPRESC: &[(&str, u32)] = &[
    ("DIV1", 0),
    ("DIV2", 1),
    ("DIV4", 3),
    ("DIV8", 7),
    ("DIV16", 15),
];
const LOCK_STATE: &[(&str, u32)] = &[("UNLOCKED", LOCK_UNLOCKED), ("LOCKED", LOCK_LOCKED)];

const CLKEN0_FLAGS: &[(u32, &str)] = &[
    (0, "LDMA"),
    (1, "LDMAXBAR"),
    (2, "RADIOAES"),
    (3, "GPCRC0"),
    (4, "TIMER0"),
    (5, "TIMER1"),
    (6, "TIMER2"),
    (7, "TIMER3"),
    (10, "ADC0"),
    (11, "AMUXCP0"),
    (12, "LETIMER0"),
    (13, "WDOG0"),
    (14, "I2C0"),
    (15, "I2C1"),
    (16, "SYSCFG"),
    (17, "DPLL0"),
    (18, "HFRCO0"),
    (19, "HFRCOEM23"),
    (20, "HFXO0"),
    (21, "FSRCO"),
    (22, "LFRCO"),
    (23, "LFXO"),
    (24, "ULFRCO"),
    (25, "I2C2"),
    (26, "GPIO"),
    (27, "PRS"),
    (28, "BURAM"),
    (29, "BURTC"),
];

// Hooks. Each runs with the clock lock held.

fn write_lockkey(_: &mut CmuState, file: &mut RegisterFile, _: u32, key: u32) {
    let lock = if key == UNLOCK_KEY {
        LOCK_UNLOCKED
    } else {
        LOCK_LOCKED
    };
    file.set_field(STATUS_LOCK, lock);
}

fn write_sysclkctrl(state: &mut CmuState, file: &mut RegisterFile, old: u32, written: u32) {
    if file.field(STATUS_LOCK) == LOCK_LOCKED {
        log::error!("cmu: SYSCLKCTRL write {written:#010X} while locked, discarded");
        file.set(SYSCLKCTRL, old);
        return;
    }
    if SYSCLKCTRL_CLKSEL.extract(written) == sysclk_sel::HFXO {
        log::debug!("cmu: SYSCLK switched to HFXO");
        state.pending_hfxo_selection = true;
    }
    state.refresh(file);
}

fn write_clock_tree(state: &mut CmuState, file: &mut RegisterFile, _: u32, _: u32) {
    state.refresh(file);
}

fn write_interrupts(state: &mut CmuState, file: &mut RegisterFile, _: u32, _: u32) {
    state.update_interrupts(file);
}

fn interrupt_register(name: &'static str) -> Register<CmuState> {
    Register::new(name, 0)
        .with(Field::flag(0, "CALRDY"))
        .with(Field::flag(1, "CALOF"))
        .on_write(write_interrupts)
}

fn clken0_register(config: &CmuConfig) -> Register<CmuState> {
    let reset = CLKEN0_HFXO0.insert(0, u32::from(config.hfxo_clock_enabled));
    CLKEN0_FLAGS
        .iter()
        .fold(Register::new("CLKEN0", reset), |register, &(shift, name)| {
            register.with(Field::flag(shift, name))
        })
        .on_write(write_clock_tree)
}

pub(crate) fn build_bank(config: &CmuConfig) -> Result<RegisterBank<CmuState>, LayoutError> {
    RegisterBank::builder("cmu")
        .register(
            IPVERSION,
            Register::new("IPVERSION", 0x0000_0008)
                .with(Field::value(0, 32, "IPVERSION").read_only()),
        )
        .register(
            CTRL,
            Register::new("CTRL", 0)
                .with(Field::value(0, 8, "RUNNINGDEBUGSEL"))
                .with(Field::flag(30, "FORCEEM1PCLKEN"))
                .with(Field::flag(31, "FORCECLKIN0")),
        )
        .register(
            STATUS,
            Register::new("STATUS", 0x0000_0001)
                .with(Field::flag(0, "CALRDY").read_only())
                .with(Field::flag(15, "REQUESTDEBUG").read_only())
                .with(Field::flag(16, "RUNNINGDEBUG").read_only())
                .with(Field::flag(17, "ISFORCEDCLKIN0").read_only())
                .with(Field::enumeration(30, 1, "WDOGLOCK", LOCK_STATE).read_only())
                .with(Field::enumeration(31, 1, "LOCK", LOCK_STATE).read_only()),
        )
        .register(
            LOCK,
            Register::new("LOCK", 0x0000_93F7)
                .with(Field::value(0, 16, "LOCKKEY").write_only().on_write(write_lockkey)),
        )
        .register(IF, interrupt_register("IF"))
        .register(IEN, interrupt_register("IEN"))
        .register(CLKEN0, clken0_register(config))
        .register(
            SYSCLKCTRL,
            Register::new("SYSCLKCTRL", SYSCLKCTRL_CLKSEL.insert(0, config.sysclk_source))
                .with(Field::enumeration(0, 3, "CLKSEL", SYSCLK_SEL))
                .with(Field::enumeration(8, 2, "LSPCLKPRESC", LSPCLKPRESC))
                .with(Field::enumeration(10, 1, "PCLKPRESC", PCLKPRESC))
                .with(Field::enumeration(12, 4, "HCLKPRESC", HCLKPRESC))
                .on_write(write_sysclkctrl),
        )
        .register(
            EM01GRPACLKCTRL,
            Register::new("EM01GRPACLKCTRL", em01grpa_sel::HFRCODPLL)
                .with(Field::enumeration(0, 3, "CLKSEL", EM01GRPA_SEL))
                .on_write(write_clock_tree),
        )
        .build()
}
