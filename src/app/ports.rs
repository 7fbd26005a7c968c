//! Port traits: the hexagonal boundary between the core loops and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IngressCore / DeviceCore
//! ```
//!
//! The core loops take these traits as generics, so the command pipeline
//! runs unchanged against real peripherals or the recording mocks used in
//! tests.

use crate::error::SensorError;
use crate::sensors::DhtReading;

// ───────────────────────────────────────────────────────────────
// Actuator port (device core → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for output devices.
pub trait ActuatorPort {
    /// Write a raw output register for `device` (0..=wrap point for the
    /// LED channel; scaled to the wiper range by the digipot adapter).
    ///
    /// Write failures are the adapter's to log; a transition keeps going.
    fn write_level(&mut self, device: usize, level: u32);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (hardware → device core)
// ───────────────────────────────────────────────────────────────

pub trait SensorPort {
    /// One DHT22 transaction.
    fn read_dht(&mut self) -> Result<DhtReading, SensorError>;

    /// Raw 12-bit LDR sample.
    fn read_light_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Serial port (gateway link, ingress core only)
// ───────────────────────────────────────────────────────────────

pub trait SerialPort {
    /// Next received byte, if one is waiting. Never blocks.
    fn read_byte(&mut self) -> Option<u8>;

    /// Transmit one protocol line; the adapter appends the terminator.
    fn write_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait Clock {
    fn now_ms(&self) -> u64;
}
