use emu_core::{ClockSource, DoubleWordPeripheral, MasterClock, Observable, Tickable, Ticks, Value};
use silabs_cmu::registers::{
    CLKEN0, CLR_OFFSET, EM01GRPACLKCTRL, LOCK, SET_OFFSET, STATUS, SYSCLKCTRL, TGL_OFFSET,
    UNLOCK_KEY, em01grpa_sel, sysclk_sel,
};
use silabs_cmu::{Cmu, CmuConfig};
use silabs_hfxo::{ClockManagement, Hfxo, HfxoConfig};

const LOCK_BIT: u32 = 1 << 31;

fn make_test_cmu() -> Cmu {
    let _ = env_logger::builder().is_test(true).try_init();
    Cmu::new(ClockSource::new(MasterClock::new(32_768)), CmuConfig::default()).expect("valid cmu")
}

#[test]
fn lock_key_toggles_status() {
    let mut cmu = make_test_cmu();
    assert_eq!(cmu.read_double_word(STATUS) & LOCK_BIT, 0);

    cmu.write_double_word(LOCK, 0);
    assert_ne!(cmu.read_double_word(STATUS) & LOCK_BIT, 0);
    assert!(cmu.is_locked());

    cmu.write_double_word(LOCK, UNLOCK_KEY);
    assert_eq!(cmu.read_double_word(STATUS) & LOCK_BIT, 0);
    // The key itself never reads back.
    assert_eq!(cmu.read_double_word(LOCK), 0);
}

#[test]
fn locked_sysclkctrl_write_is_discarded() {
    let mut cmu = make_test_cmu();
    cmu.write_double_word(LOCK, 0);
    cmu.write_double_word(SYSCLKCTRL, sysclk_sel::HFXO);

    assert_eq!(cmu.read_double_word(SYSCLKCTRL), sysclk_sel::FSRCO);
    assert!(!cmu.take_hfxo_selection());
    assert!(!cmu.signals().is_requested());

    cmu.write_double_word(LOCK, UNLOCK_KEY);
    cmu.write_double_word(SYSCLKCTRL, sysclk_sel::HFXO);
    assert_eq!(cmu.read_double_word(SYSCLKCTRL), sysclk_sel::HFXO);
    assert!(cmu.take_hfxo_selection());
}

#[test]
fn request_follows_every_hfxo_branch() {
    let mut cmu = make_test_cmu();
    let signals = cmu.signals();
    assert!(!signals.is_requested());

    cmu.write_double_word(EM01GRPACLKCTRL, em01grpa_sel::HFXO);
    assert!(signals.is_requested());
    cmu.write_double_word(EM01GRPACLKCTRL, em01grpa_sel::HFXORT);
    assert!(signals.is_requested());
    cmu.write_double_word(EM01GRPACLKCTRL, em01grpa_sel::HFRCODPLL);
    assert!(!signals.is_requested());

    cmu.write_double_word(SYSCLKCTRL, sysclk_sel::HFXO);
    assert!(signals.is_requested());
    // HFXO (3) -> HFRCODPLL (2) through the clear window.
    cmu.write_double_word(SYSCLKCTRL + CLR_OFFSET, 0b1);
    assert_eq!(cmu.read_double_word(SYSCLKCTRL), sysclk_sel::HFRCODPLL);
    assert!(!signals.is_requested());
}

#[test]
fn sysclk_selection_through_set_window() {
    let mut cmu = make_test_cmu();
    // FSRCO (1) | 2 = HFXO (3)
    cmu.write_double_word(SYSCLKCTRL + SET_OFFSET, 0b10);
    assert_eq!(cmu.query("SYSCLKCTRL.CLKSEL"), Some(Value::Enum {
        code: sysclk_sel::HFXO,
        name: Some("HFXO"),
    }));
    assert!(cmu.take_hfxo_selection());
}

#[test]
fn clken0_gates_hfxo_bus_clock() {
    let mut cmu = make_test_cmu();
    let signals = cmu.signals();
    assert!(signals.is_enabled());

    cmu.write_double_word(CLKEN0 + TGL_OFFSET, 1 << 20);
    assert!(!signals.is_enabled());
    assert_eq!(cmu.query("CLKEN0.HFXO0"), Some(Value::Bool(false)));

    cmu.write_double_word(CLKEN0 + SET_OFFSET, 1 << 20);
    assert!(signals.is_enabled());
}

#[test]
fn configured_reset_state() {
    let config = CmuConfig {
        hfxo_clock_enabled: false,
        sysclk_source: sysclk_sel::HFXO,
    };
    let mut cmu = Cmu::new(ClockSource::new(MasterClock::new(32_768)), config).expect("valid cmu");
    let signals = cmu.signals();
    assert!(signals.is_requested());
    assert!(!signals.is_enabled());
    // Reset state is not a fresh selection.
    assert!(!cmu.take_hfxo_selection());

    cmu.write_double_word(SYSCLKCTRL, sysclk_sel::FSRCO);
    cmu.reset();
    assert_eq!(cmu.read_double_word(SYSCLKCTRL), sysclk_sel::HFXO);
}

#[test]
fn hfxo_prs_startup_completed_by_sysclk_switch() {
    let clock = ClockSource::new(MasterClock::new(32_768));
    let mut cmu = Cmu::new(clock.clone(), CmuConfig::default()).expect("valid cmu");
    let config = HfxoConfig {
        timer_frequency_hz: 32_768,
        startup_delay_ticks: 10,
    };
    let mut hfxo = Hfxo::new(clock.clone(), cmu.signals(), config).expect("valid hfxo");
    hfxo.on_enabled_transition(cmu.hfxo_enable_listener());

    hfxo.on_early_wakeup_request();
    assert_eq!(cmu.hfxo_enable_events(), 1);
    clock.advance(Ticks::new(10));
    hfxo.tick_n(Ticks::new(10));
    assert!(!hfxo.is_ready());

    cmu.write_double_word(SYSCLKCTRL, sysclk_sel::HFXO);
    if cmu.take_hfxo_selection() {
        hfxo.notify_selected_as_clock_source();
    }
    assert!(hfxo.is_ready());
    assert_eq!(cmu.query("hfxo_requested"), Some(Value::Bool(true)));
}
