//! Lightbridge firmware library.
//!
//! Dual-core bridge between a UART gateway and a dimmable LED, a digipot,
//! a DHT22 and an LDR. Exposes every module for integration testing; all
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channel;
pub mod config;
pub mod cores;
pub mod devices;
pub mod error;
pub mod modes;
pub mod protocol;
pub mod sensors;
pub mod shared;
pub mod timer;

pub mod adapters;
pub mod drivers;
pub mod pins;
