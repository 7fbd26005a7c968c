//! Unified error types for the lightbridge firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the two
//! core loops handle failures the same way: log, drop, keep looping.
//! All variants are `Copy` so they pass through the hot path without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A command word could not be built or addressed.
    Command(CommandError),
    /// A device operation was rejected.
    Device(DeviceError),
    /// A sensor could not be read.
    Sensor(SensorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Device index has no marker bit below the kind bit (bit 31).
    IndexNotAddressable(u8),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexNotAddressable(i) => write!(f, "device index {i} not addressable"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Decoded index is not a configured device.
    IndexOutOfRange(usize),
    /// A transition is still running; only one may be in flight.
    Busy,
    /// The device is in an operation mode and takes no direct output.
    ModeActive(usize),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange(i) => write!(f, "device index {i} out of range"),
            Self::Busy => write!(f, "transition in progress"),
            Self::ModeActive(i) => write!(f, "device {i} is in an operation mode"),
        }
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// DHT22 did not answer the start pulse in time.
    NoResponse,
    /// DHT22 frame checksum mismatch.
    Checksum,
    /// Bit timing fell outside the protocol window.
    Timing,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Timing => write!(f, "bit timing out of window"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}
