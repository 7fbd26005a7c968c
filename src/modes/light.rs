//! Light-responsive LED policy.
//!
//! ```text
//!   reading > daylight        → anchor = daylight, output = min
//!   reading < dark            → anchor = dark,     output = max
//!   |reading − anchor| > δ    → anchor = reading,  output = lerp(dark→max, daylight→min)
//!   otherwise                 → no change
//! ```
//!
//! The anchor is the reading at which the LED last reacted; the dead band
//! around it keeps ADC noise from retriggering transitions.

use crate::config::SystemConfig;
use crate::devices::{LED_DEVICE, OutputEngine};
use crate::error::DeviceError;
use crate::shared::SharedState;

pub struct LightResponsiveController {
    anchor: f32,
    daylight: f32,
    dark: f32,
    delta: f32,
    min_output: u8,
    max_output: u8,
}

impl LightResponsiveController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            anchor: 0.0,
            daylight: config.ldr_daylight_threshold,
            dark: config.ldr_dark_threshold,
            delta: config.ldr_delta,
            min_output: config.led_min_intensity,
            max_output: config.led_max_intensity,
        }
    }

    pub fn anchor(&self) -> f32 {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: f32) {
        self.anchor = anchor;
    }

    /// Decide the LED target for a reading, updating the anchor.
    ///
    /// `None` means the reading is inside the dead band.
    pub fn evaluate(&mut self, reading: f32) -> Option<u8> {
        if reading > self.daylight {
            self.anchor = self.daylight;
            Some(self.min_output)
        } else if reading < self.dark {
            self.anchor = self.dark;
            Some(self.max_output)
        } else if (reading - self.anchor).abs() > self.delta {
            self.anchor = reading;
            Some(self.interpolate(reading))
        } else {
            None
        }
    }

    /// Output for a reading between the thresholds; brighter means lower.
    pub fn interpolate(&self, reading: f32) -> u8 {
        let span = self.daylight - self.dark;
        let fraction = ((self.daylight - reading) / span).clamp(0.0, 1.0);
        let range = f32::from(self.max_output - self.min_output);
        self.min_output + (fraction * range) as u8
    }

    /// Run one policy step against the latest reading.
    ///
    /// Returns whether a transition was started.
    pub fn tick(
        &mut self,
        reading: f32,
        outputs: &mut OutputEngine,
        shared: &SharedState,
        now_ms: u64,
    ) -> Result<bool, DeviceError> {
        match self.evaluate(reading) {
            Some(target) => {
                log::debug!(
                    "light: reading {:.2}, anchor {:.2}, target {}",
                    reading,
                    self.anchor,
                    target
                );
                outputs.set_output(LED_DEVICE, u16::from(target), now_ms, shared)
            }
            None => Ok(false),
        }
    }

    /// Drive the LED to the minimum output.
    pub fn shutdown(
        &mut self,
        outputs: &mut OutputEngine,
        shared: &SharedState,
        now_ms: u64,
    ) -> Result<bool, DeviceError> {
        outputs.set_output(LED_DEVICE, u16::from(self.min_output), now_ms, shared)
    }
}
