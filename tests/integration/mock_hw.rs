//! Mock hardware and gateway for integration tests.
//!
//! [`MockHardware`] records every actuator write and serves scripted sensor
//! values; [`MockSerial`] plays the gateway side of the UART. [`Bench`]
//! wires both core loops to one [`SharedState`] on a virtual clock.

use std::collections::VecDeque;

use lightbridge::app::ports::{ActuatorPort, SensorPort, SerialPort};
use lightbridge::config::SystemConfig;
use lightbridge::cores::{DeviceCore, IngressCore};
use lightbridge::error::SensorError;
use lightbridge::sensors::DhtReading;
use lightbridge::shared::SharedState;
use lightbridge::timer::{TimerPeriods, on_timer_tick};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCall {
    pub device: usize,
    pub level: u32,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub dht: Result<DhtReading, SensorError>,
    pub light_raw: u16,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            dht: Err(SensorError::NoResponse),
            light_raw: 0,
        }
    }

    /// Last level written to `device`, if any.
    pub fn level(&self, device: usize) -> Option<u32> {
        self.calls
            .iter()
            .rev()
            .find(|c| c.device == device)
            .map(|c| c.level)
    }

    pub fn writes_to(&self, device: usize) -> usize {
        self.calls.iter().filter(|c| c.device == device).count()
    }
}

impl ActuatorPort for MockHardware {
    fn write_level(&mut self, device: usize, level: u32) {
        self.calls.push(ActuatorCall { device, level });
    }
}

impl SensorPort for MockHardware {
    fn read_dht(&mut self) -> Result<DhtReading, SensorError> {
        self.dht
    }

    fn read_light_raw(&mut self) -> u16 {
        self.light_raw
    }
}

// ── MockSerial ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<String>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn feed(&mut self, text: &str) {
        self.rx.extend(text.bytes());
    }

    pub fn count(&self, line: &str) -> usize {
        self.tx.iter().filter(|l| *l == line).count()
    }

    pub fn take_tx(&mut self) -> Vec<String> {
        std::mem::take(&mut self.tx)
    }
}

impl SerialPort for MockSerial {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.tx.push(line.to_owned());
    }
}

// ── Bench ─────────────────────────────────────────────────────

/// Both cores stepped in lockstep, one virtual millisecond per step.
pub struct Bench<'a> {
    pub shared: &'a SharedState,
    pub ingress: IngressCore<'a>,
    pub device: DeviceCore<'a>,
    pub serial: MockSerial,
    pub hw: MockHardware,
    pub periods: TimerPeriods,
    pub now_ms: u64,
}

#[allow(dead_code)]
impl<'a> Bench<'a> {
    pub fn new(shared: &'a SharedState, config: &SystemConfig) -> Self {
        Self {
            shared,
            ingress: IngressCore::new(shared),
            device: DeviceCore::new(shared, config),
            serial: MockSerial::default(),
            hw: MockHardware::new(),
            periods: TimerPeriods::from_config(config),
            now_ms: 0,
        }
    }

    pub fn send(&mut self, text: &str) {
        self.serial.feed(text);
    }

    pub fn step(&mut self) {
        self.ingress.poll(&mut self.serial);
        self.device.poll(self.now_ms, &mut self.hw);
        self.now_ms += 1;
    }

    pub fn is_idle(&self) -> bool {
        self.serial.rx.is_empty()
            && !self.device.outputs().is_busy()
            && self.shared.channel.pending().is_none()
    }

    /// Step until two consecutive passes leave nothing in flight, so a
    /// mode that reacts to the previous pass has had its turn.
    ///
    /// Panics if that takes longer than `max_steps`.
    pub fn settle(&mut self, max_steps: usize) {
        let mut idle_passes = 0;
        for _ in 0..max_steps {
            self.step();
            idle_passes = if self.is_idle() { idle_passes + 1 } else { 0 };
            if idle_passes == 2 {
                return;
            }
        }
        panic!("bench did not settle within {max_steps} steps");
    }

    /// Fire the flag timer `ticks` times, stepping the cores after each.
    pub fn timer_ticks(&mut self, ticks: u32) {
        for _ in 0..ticks {
            on_timer_tick(self.shared, &self.periods);
            self.step();
        }
    }
}
