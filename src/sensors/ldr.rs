//! Light-dependent resistor on ADC1.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot read of the LDR channel (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_LDR_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_ldr_adc(raw: u16) {
    SIM_LDR_ADC.store(raw, Ordering::Relaxed);
}

/// 12-bit full scale onto 0-100.
pub const LDR_CONVERSION: f32 = 100.0 / 4096.0;

/// Light level (0-100) for a raw 12-bit sample.
pub fn level_from_raw(raw: u16) -> f32 {
    f32::from(raw) * LDR_CONVERSION
}

pub struct LightSensor;

impl LightSensor {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_LDR)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&self) -> u16 {
        SIM_LDR_ADC.load(Ordering::Relaxed)
    }
}

impl Default for LightSensor {
    fn default() -> Self {
        Self::new()
    }
}
