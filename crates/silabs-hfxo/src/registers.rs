//! HFXO register map.
//!
//! Offsets, field handles and the table the register bank is built from.

use silabs_registers::{Field, FieldRef, LayoutError, Register, RegisterBank, RegisterFile};

use crate::sequencer::HfxoState;

pub const IPVERSION: u32 = 0x000;
pub const TRIM: u32 = 0x004;
pub const XOUTTRIM: u32 = 0x00C;
pub const XTALCFG: u32 = 0x010;
pub const XTALCTRL: u32 = 0x018;
pub const XTALCTRL1: u32 = 0x01C;
pub const CFG: u32 = 0x020;
pub const SLEEPYXTALCFG0: u32 = 0x028;
pub const SLEEPYXTALCFG1: u32 = 0x02C;
pub const CTRL: u32 = 0x030;
pub const CMD: u32 = 0x054;
pub const STATUS: u32 = 0x058;
pub const AVGSTARTUPTIME: u32 = 0x05C;
pub const IF: u32 = 0x070;
pub const IEN: u32 = 0x074;
pub const LOCK: u32 = 0x080;

/// Window offsets for the alias operations.
pub const SET_OFFSET: u32 = 0x1000;
pub const CLR_OFFSET: u32 = 0x2000;
pub const TGL_OFFSET: u32 = 0x3000;

/// `LOCK.LOCKKEY` value that unlocks the register interface.
pub const UNLOCK_KEY: u32 = 0x580E;

pub const XTALCTRL_COREBIASANA: FieldRef = FieldRef::value(XTALCTRL, 0, 9);
pub const XTALCTRL_SKIPCOREBIASOPT: FieldRef = FieldRef::flag(XTALCTRL, 31);

pub const CTRL_PRSSTATUSSEL0: FieldRef = FieldRef::value(CTRL, 8, 4);
pub const CTRL_PRSSTATUSSEL1: FieldRef = FieldRef::value(CTRL, 12, 4);
pub const CTRL_FORCEEN: FieldRef = FieldRef::flag(CTRL, 16);
pub const CTRL_DISONDEMAND: FieldRef = FieldRef::flag(CTRL, 24);

pub const CMD_COREBIASOPT: FieldRef = FieldRef::flag(CMD, 0);

pub const STATUS_RDY: FieldRef = FieldRef::flag(STATUS, 0);
pub const STATUS_COREBIASOPTRDY: FieldRef = FieldRef::flag(STATUS, 1);
pub const STATUS_PRSRDY: FieldRef = FieldRef::flag(STATUS, 2);
pub const STATUS_ENS: FieldRef = FieldRef::flag(STATUS, 16);
pub const STATUS_HWREQ: FieldRef = FieldRef::flag(STATUS, 17);
pub const STATUS_ISFORCED: FieldRef = FieldRef::flag(STATUS, 18);
pub const STATUS_PRSHWREQ: FieldRef = FieldRef::flag(STATUS, 20);
pub const STATUS_LOCK: FieldRef = FieldRef::flag(STATUS, 31);

pub const IF_RDY: FieldRef = FieldRef::flag(IF, 0);
pub const IF_COREBIASOPTRDY: FieldRef = FieldRef::flag(IF, 1);
pub const IF_PRSRDY: FieldRef = FieldRef::flag(IF, 2);
pub const IEN_RDY: FieldRef = FieldRef::flag(IEN, 0);
pub const IEN_PRSRDY: FieldRef = FieldRef::flag(IEN, 2);

/// `STATUS.LOCK` codes.
pub const LOCK_UNLOCKED: u32 = 0;
pub const LOCK_LOCKED: u32 = 1;

/// `CTRL.PRSSTATUSSEL0/1` codes.
pub mod prs_status_sel {
    pub const DISABLED: u32 = 0;
    pub const ENS: u32 = 1;
    pub const COREBIASOPTRDY: u32 = 2;
    pub const RDY: u32 = 3;
    pub const PRSRDY: u32 = 4;
    pub const SYSRTCRDY: u32 = 5;
    pub const BUFOUTRDY: u32 = 6;
    pub const CLKINTRA0RDY: u32 = 7;
    pub const CLKINTRA1RDY: u32 = 8;
    pub const HWREQ: u32 = 9;
    pub const PRSHWREQ: u32 = 10;
    pub const SYSRTCHWREQ: u32 = 11;
    pub const BUFOUTHWREQ: u32 = 12;
    pub const CLKINTRA0HWREQ: u32 = 13;
    pub const CLKINTRA1HWREQ: u32 = 14;
}

const PRS_STATUS_SEL: &[(&str, u32)] = &[
    ("DISABLED", prs_status_sel::DISABLED),
    ("ENS", prs_status_sel::ENS),
    ("COREBIASOPTRDY", prs_status_sel::COREBIASOPTRDY),
    ("RDY", prs_status_sel::RDY),
    ("PRSRDY", prs_status_sel::PRSRDY),
    ("SYSRTCRDY", prs_status_sel::SYSRTCRDY),
    ("BUFOUTRDY", prs_status_sel::BUFOUTRDY),
    ("CLKINTRA0RDY", prs_status_sel::CLKINTRA0RDY),
    ("CLKINTRA1RDY", prs_status_sel::CLKINTRA1RDY),
    ("HWREQ", prs_status_sel::HWREQ),
    ("PRSHWREQ", prs_status_sel::PRSHWREQ),
    ("SYSRTCHWREQ", prs_status_sel::SYSRTCHWREQ),
    ("BUFOUTHWREQ", prs_status_sel::BUFOUTHWREQ),
    ("CLKINTRA0HWREQ", prs_status_sel::CLKINTRA0HWREQ),
    ("CLKINTRA1HWREQ", prs_status_sel::CLKINTRA1HWREQ),
];

const TIMEOUTSTEADY: &[(&str, u32)] = &[
    ("T4US", 0),
    ("T16US", 1),
    ("T41US", 2),
    ("T83US", 3),
    ("T125US", 4),
    ("T166US", 5),
    ("T208US", 6),
    ("T250US", 7),
    ("T333US", 8),
    ("T416US", 9),
    ("T500US", 10),
    ("T666US", 11),
    ("T833US", 12),
    ("T1666US", 13),
    ("T2500US", 14),
    ("T4166US", 15),
];

const TIMEOUTCBLSB: &[(&str, u32)] = &[
    ("T8US", 0),
    ("T20US", 1),
    ("T41US", 2),
    ("T62US", 3),
    ("T83US", 4),
    ("T104US", 5),
    ("T125US", 6),
    ("T166US", 7),
    ("T208US", 8),
    ("T250US", 9),
    ("T333US", 10),
    ("T416US", 11),
    ("T833US", 12),
    ("T1250US", 13),
    ("T2083US", 14),
    ("T3750US", 15),
];

const CTUNEFIXANA: &[(&str, u32)] = &[("NONE", 0), ("SEL0", 1), ("SEL1", 2), ("SEL2", 3)];
const MODE: &[(&str, u32)] = &[("XTAL", 0), ("EXTCLK", 1), ("EXTCLKPKDET", 2)];
const NUMSTUPMEAS: &[(&str, u32)] = &[
    ("MEASURE1", 0),
    ("MEASURE8", 1),
    ("MEASURE16", 2),
    ("NA", 3),
];
const PULL: &[(&str, u32)] = &[("DISABLE", 0), ("ENABLE", 1)];
const LOCK_STATE: &[(&str, u32)] = &[("UNLOCKED", LOCK_UNLOCKED), ("LOCKED", LOCK_LOCKED)];

// Hooks. Each runs with the clock lock held.

fn write_forceen(state: &mut HfxoState, file: &mut RegisterFile, old: u32, new: u32) {
    match (old != 0, new != 0) {
        (false, true) => state.start_forced(file),
        (true, false) => state.disable_if_unused(file),
        _ => {}
    }
}

fn write_disondemand(state: &mut HfxoState, file: &mut RegisterFile, _: u32, _: u32) {
    state.disable_if_unused(file);
}

fn write_corebiasopt(state: &mut HfxoState, file: &mut RegisterFile, _: u32, new: u32) {
    if new != 0 {
        state.start_core_bias_optimisation(file);
    }
}

fn poll_corebiasoptrdy(state: &mut HfxoState, _: &RegisterFile, stored: u32) -> u32 {
    u32::from(state.core_bias.poll(stored != 0))
}

fn read_corebiasoptrdy(state: &mut HfxoState, file: &mut RegisterFile, _: u32) {
    if state.core_bias.take_completed() {
        file.set_flag(IF_COREBIASOPTRDY, true);
    }
}

fn provide_hwreq(state: &mut HfxoState, _: &RegisterFile, _: u32) -> u32 {
    u32::from(state.is_requested_on_demand())
}

fn provide_isforced(state: &mut HfxoState, _: &RegisterFile, _: u32) -> u32 {
    u32::from(state.force_enabled)
}

fn write_lockkey(_: &mut HfxoState, file: &mut RegisterFile, _: u32, key: u32) {
    let lock = if key == UNLOCK_KEY {
        LOCK_UNLOCKED
    } else {
        LOCK_LOCKED
    };
    file.set_field(STATUS_LOCK, lock);
}

fn write_interrupts(state: &mut HfxoState, file: &mut RegisterFile, _: u32, _: u32) {
    state.update_interrupts(file);
}

fn is_enabled(_: &HfxoState, file: &RegisterFile) -> bool {
    file.flag(STATUS_ENS)
}

/// IF and IEN share one layout.
fn interrupt_register(name: &'static str) -> Register<HfxoState> {
    Register::new(name, 0)
        .with(Field::flag(0, "RDY"))
        .with(Field::flag(1, "COREBIASOPTRDY"))
        .with(Field::flag(2, "PRSRDY"))
        .with(Field::flag(3, "BUFOUTRDY"))
        .with(Field::flag(4, "SYSRTCRDY"))
        .with(Field::flag(8, "STUPMEASDONE"))
        .with(Field::flag(9, "SLEEPYXTAL"))
        .with(Field::flag(12, "INJSKIP"))
        .with(Field::flag(15, "BUFOUTFROZEN"))
        .with(Field::flag(20, "PRSERR"))
        .with(Field::flag(21, "BUFOUTERR"))
        .with(Field::flag(22, "SYSRTCERR"))
        .with(Field::flag(25, "INJERR"))
        .with(Field::flag(26, "DNSSLEEPYXTALERR"))
        .with(Field::flag(27, "BUFOUTFREEZEERR"))
        .with(Field::flag(28, "BUFOUTDNSERR"))
        .with(Field::flag(29, "DNSERR"))
        .with(Field::flag(30, "LFTIMEOUTERR"))
        .with(Field::flag(31, "COREBIASOPTERR"))
        .on_write(write_interrupts)
}

pub(crate) fn build_bank() -> Result<RegisterBank<HfxoState>, LayoutError> {
    RegisterBank::builder("hfxo")
        .register(
            IPVERSION,
            Register::new("IPVERSION", 0x0000_0005)
                .with(Field::value(0, 32, "IPVERSION").read_only()),
        )
        .register(
            TRIM,
            Register::new("TRIM", 0x670F_0711)
                .with(Field::value(0, 2, "REGTRIMCGMANA"))
                .with(Field::value(4, 2, "VTRCORETCANA"))
                .with(Field::value(8, 5, "REGTRIMVREG0"))
                .with(Field::value(16, 5, "REGTRIMVREG1"))
                .with(Field::value(24, 4, "VTRCORETRIMANA"))
                .with(Field::value(28, 4, "SHUNTLVLANA"))
                .static_config(),
        )
        .register(
            XOUTTRIM,
            Register::new("XOUTTRIM", 0x0005_4534)
                .with(Field::value(0, 3, "VREGBIASTRIMIBNDIOANA"))
                .with(Field::value(4, 3, "VREGBIASTRIMIBCOREANA"))
                .with(Field::value(8, 2, "XOUTCASBIASANA"))
                .with(Field::value(10, 2, "XOUTPDIOCASANA"))
                .with(Field::value(12, 4, "XOUTCMFILTRESANA"))
                .with(Field::value(16, 3, "VTRTCANA"))
                .static_config(),
        )
        .register(
            XTALCFG,
            Register::new("XTALCFG", 0x2BC0_0208)
                .with(Field::value(0, 4, "COREBIASSTARTUPI"))
                .with(Field::value(6, 4, "COREBIASSTARTUP"))
                .with(Field::value(12, 3, "CTUNEXISTARTUP"))
                .with(Field::value(16, 3, "CTUNEXOSTARTUP"))
                .with(Field::enumeration(20, 4, "TIMEOUTSTEADY", TIMEOUTSTEADY))
                .with(Field::enumeration(24, 4, "TIMEOUTCBLSB", TIMEOUTCBLSB))
                .with(Field::value(28, 4, "TINJ"))
                .static_config(),
        )
        .register(
            XTALCTRL,
            Register::new("XTALCTRL", 0x0240_4078)
                .with(Field::value(0, 9, "COREBIASANA"))
                .with(Field::value(9, 8, "CTUNEXIANA"))
                .with(Field::value(17, 8, "CTUNEXOANA"))
                .with(Field::enumeration(25, 2, "CTUNEFIXANA", CTUNEFIXANA))
                .with(Field::flag(31, "SKIPCOREBIASOPT")),
        )
        .register(
            XTALCTRL1,
            Register::new("XTALCTRL1", 0x0007_0200)
                .with(Field::value(8, 4, "CTUNEXIBUFOUTDELTA"))
                .with(Field::value(16, 5, "COREBIASBUFOUTDELTA"))
                .static_config(),
        )
        .register(
            CFG,
            Register::new("CFG", 0x1800_0000)
                .with(Field::enumeration(0, 2, "MODE", MODE))
                .with(Field::flag(2, "ENXIDCBIASANA"))
                .with(Field::flag(8, "SLEEPYXTALSUPEN"))
                .with(Field::flag(9, "STUPMEASEN"))
                .with(Field::enumeration(10, 2, "NUMSTUPMEAS", NUMSTUPMEAS))
                .with(Field::flag(27, "FORCELFTIMEOUTSYSRTC"))
                .with(Field::flag(28, "FORCELFTIMEOUTPRS"))
                .with(Field::flag(29, "FORCEHFTIMEOUT"))
                .with(Field::flag(30, "SQBUFENSTARTUPI"))
                .with(Field::flag(31, "DISFSM"))
                .static_config(),
        )
        .register(
            SLEEPYXTALCFG0,
            Register::new("SLEEPYXTALCFG0", 0x2020_0518)
                .with(Field::value(0, 4, "PKDETTHSUPSLEEPY"))
                .with(Field::value(4, 4, "PKDETTHSUPISLEEPY"))
                .with(Field::value(8, 4, "PKDETTHANASLEEPY"))
                .with(Field::value(16, 3, "CTUNEXISUPSLEEPY"))
                .with(Field::value(20, 3, "CTUNEXIANASLEEPY"))
                .with(Field::value(24, 3, "CTUNEXOSUPSLEEPY"))
                .with(Field::value(28, 3, "CTUNEXOANASLEEPY"))
                .static_config(),
        )
        .register(
            SLEEPYXTALCFG1,
            Register::new("SLEEPYXTALCFG1", 0x07FF_FFFF)
                .with(Field::value(0, 9, "COREBIASSUPSLEEPY"))
                .with(Field::value(9, 9, "COREBIASSUPISLEEPY"))
                .with(Field::value(18, 9, "COREBIASANASLEEPY"))
                .static_config(),
        )
        .register(
            CTRL,
            Register::new("CTRL", 0x0F00_0040)
                .with(Field::flag(0, "BUFOUTFREEZE"))
                .with(Field::flag(2, "KEEPWARM"))
                .with(Field::flag(3, "EM23ONDEMAND"))
                .with(Field::enumeration(4, 1, "FORCEXI2GNDANA", PULL))
                .with(Field::enumeration(5, 1, "FORCEXO2GNDANA", PULL))
                .with(Field::flag(6, "FORCECTUNEMAX"))
                .with(Field::enumeration(8, 4, "PRSSTATUSSEL0", PRS_STATUS_SEL))
                .with(Field::enumeration(12, 4, "PRSSTATUSSEL1", PRS_STATUS_SEL))
                .with(Field::flag(16, "FORCEEN").on_write(write_forceen))
                .with(Field::flag(17, "FORCEENPRS"))
                .with(Field::flag(18, "FORCEENBUFOUT"))
                .with(Field::flag(19, "FORCEENSYSRTC"))
                .with(Field::flag(24, "DISONDEMAND").on_write(write_disondemand))
                .with(Field::flag(25, "DISONDEMANDPRS"))
                .with(Field::flag(26, "DISONDEMANDBUFOUT"))
                .with(Field::flag(27, "DISONDEMANDSYSRTC"))
                .with(Field::flag(31, "FORCERAWCLK")),
        )
        .register(
            CMD,
            Register::new("CMD", 0)
                .with(
                    Field::flag(0, "COREBIASOPT")
                        .write_only()
                        .on_write(write_corebiasopt),
                )
                .with(Field::flag(1, "STARTMEAS").write_only())
                .with(Field::flag(2, "STOPMEAS").write_only()),
        )
        .register(
            STATUS,
            Register::new("STATUS", 0)
                .with(Field::flag(0, "RDY").read_only())
                .with(
                    Field::flag(1, "COREBIASOPTRDY")
                        .read_only()
                        .provider(poll_corebiasoptrdy)
                        .on_read(read_corebiasoptrdy),
                )
                .with(Field::flag(2, "PRSRDY").read_only())
                .with(Field::flag(3, "BUFOUTRDY").read_only())
                .with(Field::flag(4, "SYSRTCRDY").read_only())
                .with(Field::flag(8, "SLEEPYXTAL").read_only())
                .with(Field::flag(9, "SLEEPYXTALERR").read_only())
                .with(Field::flag(15, "BUFOUTFROZEN").read_only())
                .with(Field::flag(16, "ENS").read_only())
                .with(Field::flag(17, "HWREQ").read_only().provider(provide_hwreq))
                .with(
                    Field::flag(18, "ISFORCED")
                        .read_only()
                        .provider(provide_isforced),
                )
                .with(Field::flag(19, "ISWARM").read_only())
                .with(Field::flag(20, "PRSHWREQ").read_only())
                .with(Field::flag(21, "BUFOUTHWREQ").read_only())
                .with(Field::flag(22, "SYSRTCHWREQ").read_only())
                .with(Field::flag(28, "STUPMEASBSY").read_only())
                .with(Field::flag(29, "INJBSY").read_only())
                .with(Field::flag(30, "SYNCBUSY").read_only())
                .with(Field::enumeration(31, 1, "LOCK", LOCK_STATE).read_only()),
        )
        .register(
            AVGSTARTUPTIME,
            Register::new("AVGSTARTUPTIME", 0).with(Field::value(0, 9, "AVGSTUP").read_only()),
        )
        .register(IF, interrupt_register("IF"))
        .register(IEN, interrupt_register("IEN"))
        .register(
            LOCK,
            Register::new("LOCK", UNLOCK_KEY).with(
                Field::value(0, 16, "LOCKKEY")
                    .write_only()
                    .on_write(write_lockkey),
            ),
        )
        .enabled_probe(is_enabled)
        .build()
}
