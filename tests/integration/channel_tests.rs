//! Command channel behaviour across the two cores.

use std::time::{Duration, Instant};

use lightbridge::config::SystemConfig;
use lightbridge::cores::DeviceCore;
use lightbridge::devices::LED_DEVICE;
use lightbridge::protocol::Command;
use lightbridge::shared::SharedState;

use crate::mock_hw::{Bench, MockHardware};

#[test]
fn burst_applies_last_word() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    bench.send("D0=10;\nD0=20;\nD0=30;\n");
    bench.settle(1_000);

    assert_eq!(shared.intensity(LED_DEVICE), 30);
    assert_eq!(bench.hw.level(LED_DEVICE), Some(240));
    assert_eq!(bench.serial.count("C0=[service denied];"), 0);
}

#[test]
fn overflowing_burst_is_reported() {
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let mut bench = Bench::new(&shared, &config);

    // Four words fill the FIFO; the fifth is refused.
    bench.send("D0=10;\nD0=20;\nD0=30;\nD0=40;\nD0=50;\n");
    bench.settle(1_000);

    assert_eq!(shared.intensity(LED_DEVICE), 40);
    assert_eq!(bench.serial.count("C0=[service denied];"), 1);
}

#[test]
fn paced_producer_never_denied_across_threads() {
    const LAST: u16 = 20;
    let shared = SharedState::new();
    let config = SystemConfig {
        step_delay_ms: 0,
        ..SystemConfig::default()
    };
    let deadline = Instant::now() + Duration::from_secs(10);

    std::thread::scope(|s| {
        let shared = &shared;
        let consumer = s.spawn(move || {
            let mut core = DeviceCore::new(shared, &config);
            let mut hw = MockHardware::new();
            let start = Instant::now();
            while shared.intensity(LED_DEVICE) != LAST as u8 || shared.channel.pending().is_some() {
                assert!(Instant::now() < deadline, "consumer timed out");
                core.poll(start.elapsed().as_millis() as u64, &mut hw);
            }
            hw
        });

        for value in 1..=LAST {
            // Wait until the previous command has been applied and acknowledged.
            while shared.intensity(LED_DEVICE) != (value - 1) as u8
                || shared.channel.pending().is_some()
            {
                assert!(Instant::now() < deadline, "producer timed out");
                std::thread::yield_now();
            }
            let word = Command::output(LED_DEVICE as u8, value)
                .to_word()
                .expect("index 0 is addressable");
            assert!(shared.channel.send(word));
        }

        let hw = consumer.join().expect("consumer panicked");
        assert_eq!(hw.level(LED_DEVICE), Some(160));
    });

    assert!(!shared.channel.take_denied());
}
