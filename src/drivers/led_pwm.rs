//! LED PWM channel behind `embedded_hal::pwm::SetDutyCycle`.
//!
//! Duty values are in wrap-point units (0..=wrap). On ESP-IDF they are
//! rescaled to the LEDC timer resolution; on host the last duty is kept in
//! an atomic for inspection.

use core::sync::atomic::{AtomicU16, Ordering};

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

static SIM_LED_DUTY: AtomicU16 = AtomicU16::new(0);

/// Last duty written by any `LedPwm` (simulation readback).
pub fn sim_led_duty() -> u16 {
    SIM_LED_DUTY.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPwmError(pub i32);

impl embedded_hal::pwm::Error for LedPwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct LedPwm {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    channel: u32,
    wrap_point: u16,
}

impl LedPwm {
    pub fn new(channel: u32, wrap_point: u16) -> Self {
        Self {
            channel,
            wrap_point,
        }
    }

    #[cfg(target_os = "espidf")]
    fn write_raw(&mut self, duty: u16) -> Result<(), LedPwmError> {
        let full = 1u32 << crate::pins::LED_PWM_RESOLUTION_BITS;
        let ledc_duty = u32::from(duty) * full / u32::from(self.wrap_point.max(1));
        crate::drivers::hw_init::ledc_set(self.channel, ledc_duty).map_err(LedPwmError)
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_raw(&mut self, duty: u16) -> Result<(), LedPwmError> {
        SIM_LED_DUTY.store(duty, Ordering::Relaxed);
        Ok(())
    }
}

impl ErrorType for LedPwm {
    type Error = LedPwmError;
}

impl SetDutyCycle for LedPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.wrap_point
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.write_raw(duty.min(self.wrap_point))
    }
}
