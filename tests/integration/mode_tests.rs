//! Operation modes driven end to end through the gateway link.

use lightbridge::config::SystemConfig;
use lightbridge::devices::{DIGIPOT_DEVICE, LED_DEVICE};
use lightbridge::modes::{MODE_AUTO, MODE_OFF};
use lightbridge::protocol::Command;
use lightbridge::shared::SharedState;

use crate::mock_hw::Bench;

// Raw 12-bit LDR samples and the 0-100 levels they convert to.
const RAW_DARK: u16 = 82; // ~2.0
const RAW_DUSK: u16 = 1024; // 25.0
const RAW_DUSK_DRIFT: u16 = 1065; // ~26.0
const RAW_DAYLIGHT: u16 = 2048; // 50.0

fn auto_bench(shared: &SharedState) -> Bench<'_> {
    let mut bench = Bench::new(shared, &SystemConfig::default());
    bench.hw.light_raw = RAW_DARK;
    bench.send("M0=1;\n");
    bench.settle(5_000);
    bench
}

#[test]
fn auto_mode_follows_light_level() {
    let shared = SharedState::new();
    let mut bench = auto_bench(&shared);
    assert_eq!(shared.mode(LED_DEVICE), MODE_AUTO);
    assert!(shared.modes_active());
    assert_eq!(shared.intensity(LED_DEVICE), 100);
    assert_eq!(bench.serial.count("D0=100;"), 1);

    bench.hw.light_raw = RAW_DUSK;
    bench.timer_ticks(1);
    bench.settle(5_000);
    assert_eq!(shared.intensity(LED_DEVICE), 41);
    assert_eq!(bench.hw.level(LED_DEVICE), Some(328));

    bench.hw.light_raw = RAW_DAYLIGHT;
    bench.timer_ticks(1);
    bench.settle(5_000);
    assert_eq!(shared.intensity(LED_DEVICE), 0);
    assert_eq!(bench.serial.count("D0=0;"), 1);
}

#[test]
fn drift_inside_dead_band_is_ignored() {
    let shared = SharedState::new();
    let mut bench = auto_bench(&shared);
    bench.hw.light_raw = RAW_DUSK;
    bench.timer_ticks(1);
    bench.settle(5_000);
    let writes = bench.hw.calls.len();

    bench.hw.light_raw = RAW_DUSK_DRIFT;
    bench.timer_ticks(3);
    bench.settle(100);

    assert_eq!(bench.hw.calls.len(), writes);
    assert_eq!(shared.intensity(LED_DEVICE), 41);
}

#[test]
fn manual_output_ignored_while_auto() {
    let shared = SharedState::new();
    let mut bench = auto_bench(&shared);
    bench.serial.take_tx();

    bench.send("D0=10;\n");
    bench.settle(100);

    assert_eq!(shared.intensity(LED_DEVICE), 100);
    assert_eq!(bench.serial.tx, vec!["C0=[D0=10;];"]);
    assert_eq!(shared.channel.pending(), None);
}

#[test]
fn mode_off_shuts_down_and_restores_manual_control() {
    let shared = SharedState::new();
    let mut bench = auto_bench(&shared);

    bench.send("M0=0;\n");
    bench.settle(5_000);
    assert_eq!(shared.mode(LED_DEVICE), MODE_OFF);
    assert!(!shared.modes_active());
    assert_eq!(shared.intensity(LED_DEVICE), 0);

    bench.send("D0=30;\n");
    bench.settle(5_000);
    assert_eq!(shared.intensity(LED_DEVICE), 30);
}

#[test]
fn mode_off_dims_manually_set_led() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D0=60;\n");
    bench.settle(1_000);
    assert_eq!(shared.intensity(LED_DEVICE), 60);

    // Already off, but the shutdown policy still runs.
    bench.send("M0=0;\n");
    bench.settle(1_000);
    assert_eq!(shared.intensity(LED_DEVICE), 0);
    assert_eq!(bench.serial.count("D0=0;"), 1);
}

#[test]
fn digipot_mode_blocks_output_without_acting() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("M1=1;\n");
    bench.settle(100);
    assert_eq!(shared.mode(DIGIPOT_DEVICE), MODE_AUTO);
    assert!(shared.modes_active());

    bench.send("D1=50;\n");
    bench.settle(100);
    assert_eq!(bench.hw.writes_to(DIGIPOT_DEVICE), 0);

    bench.send("M1=0;\n");
    bench.settle(100);
    assert_eq!(bench.hw.writes_to(DIGIPOT_DEVICE), 0);

    bench.send("D1=50;\n");
    bench.settle(5_000);
    assert_eq!(shared.intensity(DIGIPOT_DEVICE), 50);
    assert_eq!(bench.hw.level(DIGIPOT_DEVICE), Some(1000));
}

#[test]
fn stale_output_word_dropped_once_mode_active() {
    let shared = SharedState::new();
    let mut bench = auto_bench(&shared);
    let writes = bench.hw.calls.len();
    bench.serial.take_tx();

    // Encoded by ingress before it saw the mode change.
    let word = Command::output(LED_DEVICE as u8, 60)
        .to_word()
        .expect("index 0 is addressable");
    assert!(shared.channel.send(word));
    bench.settle(5_000);

    assert_eq!(shared.mode(LED_DEVICE), MODE_AUTO);
    assert_eq!(shared.intensity(LED_DEVICE), 100);
    assert_eq!(bench.hw.calls.len(), writes);
    assert_eq!(bench.serial.count("D0=60;"), 0);
    assert_eq!(shared.channel.pending(), None);

    // Manual control works again once the mode is cleared.
    bench.send("M0=0;\n");
    bench.settle(5_000);
    bench.send("D0=60;\n");
    bench.settle(5_000);
    assert_eq!(shared.intensity(LED_DEVICE), 60);
}
