//! Gateway line in, actuator writes and telemetry out.

use lightbridge::config::SystemConfig;
use lightbridge::devices::{DIGIPOT_DEVICE, LED_DEVICE};
use lightbridge::sensors::DhtReading;
use lightbridge::shared::SharedState;

use crate::mock_hw::Bench;

const DENIED: &str = "C0=[service denied];";

#[test]
fn output_command_ramps_led_and_reports() {
    let shared = SharedState::new();
    let mut bench = Bench::new(&shared, &SystemConfig::default());

    bench.send("D0=75;\n");
    bench.settle(5_000);

    assert_eq!(shared.intensity(LED_DEVICE), 75);
    // 75 % of the LED's 800-count linear range, one write per count plus
    // the exact target.
    assert_eq!(bench.hw.level(LED_DEVICE), Some(600));
    assert_eq!(bench.hw.writes_to(LED_DEVICE), 601);
    assert_eq!(bench.serial.tx, vec!["C0=[D0=75;];", "D0=75;"]);
}

#[test]
fn ramp_takes_one_step_delay_per_count() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 2,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D0=1;\n");
    bench.settle(1_000);

    // 1 % of 800 is 8 counts: 8 delayed steps, then the target.
    let levels: Vec<u32> = bench.hw.calls.iter().map(|c| c.level).collect();
    assert_eq!(levels, (0..=8).collect::<Vec<_>>());
    assert!(bench.now_ms >= 16);
}

#[test]
fn digipot_uses_full_range() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D1=100;\n");
    bench.settle(5_000);

    assert_eq!(shared.intensity(DIGIPOT_DEVICE), 100);
    assert_eq!(bench.hw.level(DIGIPOT_DEVICE), Some(2000));
    assert_eq!(bench.hw.writes_to(LED_DEVICE), 0);
    assert_eq!(bench.serial.count("D1=100;"), 1);
}

#[test]
fn repeated_value_is_silent() {
    let shared = SharedState::new();
    let mut bench = Bench::new(&shared, &SystemConfig::default());

    bench.send("D0=0;\n");
    bench.settle(100);

    assert!(bench.hw.calls.is_empty());
    assert_eq!(bench.serial.tx, vec!["C0=[D0=0;];"]);
}

#[test]
fn values_above_full_scale_clamp() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D0=250;\n");
    bench.settle(5_000);

    assert_eq!(shared.intensity(LED_DEVICE), 100);
    assert_eq!(bench.hw.level(LED_DEVICE), Some(800));
    assert_eq!(bench.serial.count("D0=100;"), 1);
}

#[test]
fn command_during_ramp_is_denied() {
    let shared = SharedState::new();
    let mut bench = Bench::new(&shared, &SystemConfig::default());

    bench.send("D0=50;\n");
    bench.step();
    assert!(bench.device.outputs().is_busy());

    bench.send("D1=20;\n");
    bench.settle(5_000);

    assert_eq!(shared.intensity(LED_DEVICE), 50);
    assert_eq!(shared.intensity(DIGIPOT_DEVICE), 0);
    assert_eq!(bench.hw.writes_to(DIGIPOT_DEVICE), 0);
    assert_eq!(bench.serial.count(DENIED), 1);
}

#[test]
fn next_command_accepted_after_acknowledge() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D0=20;\n");
    bench.settle(1_000);
    bench.send("D0=10;\n");
    bench.settle(1_000);

    assert_eq!(shared.intensity(LED_DEVICE), 10);
    assert_eq!(bench.hw.level(LED_DEVICE), Some(80));
    assert_eq!(bench.serial.count("D0=20;"), 1);
    assert_eq!(bench.serial.count("D0=10;"), 1);
    assert_eq!(bench.serial.count(DENIED), 0);
}

#[test]
fn unknown_device_is_dropped_without_blocking() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D5=10;\n");
    bench.settle(100);
    assert!(bench.hw.calls.is_empty());
    assert_eq!(shared.channel.pending(), None);

    bench.send("D0=3;\n");
    bench.settle(1_000);
    assert_eq!(shared.intensity(LED_DEVICE), 3);
    assert_eq!(bench.serial.count(DENIED), 0);
}

#[test]
fn noise_lines_are_echoed_and_ignored() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("hello\r\nX0=1;\r\nD0=-4;\r\nD0=5;\r\n");
    bench.settle(1_000);

    assert_eq!(
        bench.serial.tx,
        vec![
            "C0=[hello];",
            "C0=[X0=1;];",
            "C0=[D0=-4;];",
            "C0=[D0=5;];",
            "D0=5;",
        ]
    );
    assert_eq!(shared.intensity(LED_DEVICE), 5);
}

#[test]
fn sensors_published_on_schedule() {
    let shared = SharedState::new();
    let mut bench = Bench::new(&shared, &SystemConfig::default());
    bench.hw.dht = Ok(DhtReading {
        humidity: 55.0,
        temperature_c: 21.5,
    });
    bench.hw.light_raw = 2048;

    bench.timer_ticks(9);
    assert!(bench.serial.tx.is_empty());

    bench.timer_ticks(1);
    assert_eq!(
        bench.serial.tx,
        vec!["S0=55.000000;", "S1=21.500000;", "S2=50.000000;"]
    );
}

#[test]
fn failed_dht_read_keeps_last_values() {
    let shared = SharedState::new();
    let mut bench = Bench::new(&shared, &SystemConfig::default());
    bench.hw.dht = Ok(DhtReading {
        humidity: 40.0,
        temperature_c: -3.5,
    });
    bench.timer_ticks(10);
    bench.serial.take_tx();

    bench.hw.dht = Err(lightbridge::error::SensorError::Checksum);
    bench.timer_ticks(10);

    assert_eq!(bench.serial.count("S0=40.000000;"), 1);
    assert_eq!(bench.serial.count("S1=-3.500000;"), 1);
}
