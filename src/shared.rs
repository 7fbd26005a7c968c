//! State shared between the timer callback and the two core loops.
//!
//! Every field is an atomic with exactly one writer. Cross-field ordering is
//! not relied upon except where noted: the ingress core only needs to see a
//! sensor value once `sensor_write` is clear, so sensor stores use
//! `Release` and the flag brackets them.
//!
//! | Field            | Writer                                  | Reader   |
//! |------------------|-----------------------------------------|----------|
//! | `intensities`    | device core (transition complete)       | both     |
//! | `modes`          | device core (`set_mode`)                | both     |
//! | `sensors`        | device core (sensor reads)              | ingress  |
//! | `sensor_write`   | device core                             | ingress  |
//! | `modes_active`   | device core                             | device   |
//! | `changed`        | device core sets, ingress takes         | ingress  |
//! | `*_due`          | timer sets, consumer takes              | consumer |
//! | `timer_count`    | timer                                   | timer    |

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, AtomicU32, Ordering};

use crate::channel::CommandChannel;
use crate::devices::DEVICE_COUNT;
use crate::sensors::SENSOR_COUNT;

pub struct SharedState {
    intensities: [AtomicU8; DEVICE_COUNT],
    modes: [AtomicU16; DEVICE_COUNT],
    /// `f32` bit patterns.
    sensors: [AtomicU32; SENSOR_COUNT],
    sensor_write: AtomicBool,
    modes_active: AtomicBool,
    /// One bit per device whose intensity changed since the last report.
    changed: AtomicU16,
    dht_due: AtomicBool,
    ldr_due: AtomicBool,
    publish_due: AtomicBool,
    timer_count: AtomicU32,
    pub channel: CommandChannel,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            intensities: [const { AtomicU8::new(0) }; DEVICE_COUNT],
            modes: [const { AtomicU16::new(0) }; DEVICE_COUNT],
            sensors: [const { AtomicU32::new(0) }; SENSOR_COUNT],
            sensor_write: AtomicBool::new(false),
            modes_active: AtomicBool::new(false),
            changed: AtomicU16::new(0),
            dht_due: AtomicBool::new(false),
            ldr_due: AtomicBool::new(false),
            publish_due: AtomicBool::new(false),
            timer_count: AtomicU32::new(0),
            channel: CommandChannel::new(),
        }
    }

    // ── Devices ───────────────────────────────────────────────

    /// Current intensity; 0 for an unknown device.
    pub fn intensity(&self, device: usize) -> u8 {
        self.intensities
            .get(device)
            .map_or(0, |a| a.load(Ordering::Acquire))
    }

    pub fn set_intensity(&self, device: usize, value: u8) {
        if let Some(a) = self.intensities.get(device) {
            a.store(value, Ordering::Release);
        }
    }

    /// Active mode id; 0 (inactive) for an unknown device.
    pub fn mode(&self, device: usize) -> u16 {
        self.modes
            .get(device)
            .map_or(0, |a| a.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, device: usize, value: u16) {
        if let Some(a) = self.modes.get(device) {
            a.store(value, Ordering::Release);
        }
    }

    pub fn modes_active(&self) -> bool {
        self.modes_active.load(Ordering::Acquire)
    }

    pub fn set_modes_active(&self, active: bool) {
        self.modes_active.store(active, Ordering::Release);
    }

    pub fn mark_changed(&self, device: usize) {
        if device < DEVICE_COUNT {
            self.changed.fetch_or(1 << device, Ordering::AcqRel);
        }
    }

    /// Take the changed-device mask, clearing it.
    pub fn take_changed(&self) -> u16 {
        self.changed.swap(0, Ordering::AcqRel)
    }

    // ── Sensors ───────────────────────────────────────────────

    pub fn sensor(&self, index: usize) -> f32 {
        self.sensors
            .get(index)
            .map_or(0.0, |a| f32::from_bits(a.load(Ordering::Acquire)))
    }

    pub fn set_sensor(&self, index: usize, value: f32) {
        if let Some(a) = self.sensors.get(index) {
            a.store(value.to_bits(), Ordering::Release);
        }
    }

    /// Bracket a batch of sensor stores so the ingress core skips publishing
    /// a half-written set.
    pub fn begin_sensor_write(&self) {
        self.sensor_write.store(true, Ordering::Release);
    }

    pub fn end_sensor_write(&self) {
        self.sensor_write.store(false, Ordering::Release);
    }

    pub fn sensor_write_in_progress(&self) -> bool {
        self.sensor_write.load(Ordering::Acquire)
    }

    // ── Timer flags ───────────────────────────────────────────

    /// Count one timer period; returns the new count.
    pub fn bump_timer_count(&self) -> u32 {
        self.timer_count.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn raise_dht_due(&self) {
        self.dht_due.store(true, Ordering::Release);
    }

    pub fn raise_ldr_due(&self) {
        self.ldr_due.store(true, Ordering::Release);
    }

    pub fn raise_publish_due(&self) {
        self.publish_due.store(true, Ordering::Release);
    }

    pub fn take_dht_due(&self) -> bool {
        self.dht_due.swap(false, Ordering::AcqRel)
    }

    pub fn take_ldr_due(&self) -> bool {
        self.ldr_due.swap(false, Ordering::AcqRel)
    }

    /// Peek without clearing: publication is deferred while sensors are
    /// being written.
    pub fn publish_due(&self) -> bool {
        self.publish_due.load(Ordering::Acquire)
    }

    pub fn clear_publish_due(&self) {
        self.publish_due.store(false, Ordering::Release);
    }
}
