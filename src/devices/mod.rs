//! Device output engine.
//!
//! Owns the register side of every output device. Intensity changes are
//! never applied as a single jump: [`OutputEngine::set_output`] starts a
//! [`Transition`](transition::Transition) which the device core's main loop
//! advances with [`OutputEngine::tick`], one register unit per step delay.
//! Between steps the loop is free to service the command doorbell.

pub mod mapping;
pub mod transition;

use crate::app::ports::ActuatorPort;
use crate::config::SystemConfig;
use crate::error::DeviceError;
use crate::shared::SharedState;

use transition::{Step, Transition};

/// Number of output devices.
pub const DEVICE_COUNT: usize = 2;

/// LED on the LEDC PWM channel.
pub const LED_DEVICE: usize = 0;

/// Digipot wiper on SPI.
pub const DIGIPOT_DEVICE: usize = 1;

/// Full-scale intensity.
pub const INTENSITY_MAX: u8 = 100;

pub struct OutputEngine {
    wrap_point: u32,
    sensitivity: [u8; DEVICE_COUNT],
    step_delay_ms: u32,
    transition: Option<Transition>,
}

impl OutputEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            wrap_point: config.wrap_point(),
            sensitivity: config.device_sensitivity_percent,
            step_delay_ms: config.step_delay_ms,
            transition: None,
        }
    }

    pub fn wrap_point(&self) -> u32 {
        self.wrap_point
    }

    /// Register ceiling of a device (intensity 100).
    pub fn max_register(&self, device: usize) -> Result<u32, DeviceError> {
        let pct = self
            .sensitivity
            .get(device)
            .ok_or(DeviceError::IndexOutOfRange(device))?;
        Ok(mapping::max_register(self.wrap_point, *pct))
    }

    pub fn is_busy(&self) -> bool {
        self.transition.is_some()
    }

    /// Device of the running transition, if any.
    pub fn busy_device(&self) -> Option<usize> {
        self.transition.as_ref().map(|t| t.device)
    }

    /// Start moving `device` toward `desired` (0-100, larger values clamp).
    ///
    /// Returns `Ok(false)` when the device is already at `desired`: no
    /// writes happen and no flags change. `Ok(true)` means a transition was
    /// started and will complete through [`tick`](Self::tick).
    pub fn set_output(
        &mut self,
        device: usize,
        desired: u16,
        now_ms: u64,
        shared: &SharedState,
    ) -> Result<bool, DeviceError> {
        let max_register = self.max_register(device)?;
        if self.transition.is_some() {
            return Err(DeviceError::Busy);
        }

        let desired = desired.min(u16::from(INTENSITY_MAX)) as u8;
        let current = shared.intensity(device);
        if desired == current {
            return Ok(false);
        }

        let from = mapping::intensity_to_register(current, max_register);
        let to = mapping::intensity_to_register(desired, max_register);
        let transition = Transition::new(device, desired, from, to, self.step_delay_ms, now_ms);
        log::debug!(
            "device {}: {} -> {} (register {} -> {}, {} steps)",
            device,
            current,
            desired,
            from,
            to,
            transition.remaining_steps()
        );
        self.transition = Some(transition);
        Ok(true)
    }

    /// Advance the running transition.
    ///
    /// Returns the device index when its transition completed on this call;
    /// the new intensity is then stored and the device marked changed.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        shared: &SharedState,
    ) -> Option<usize> {
        let transition = self.transition.as_mut()?;
        loop {
            match transition.next_step(now_ms) {
                Step::Wait => return None,
                Step::Write(level) => hw.write_level(transition.device, level),
                Step::Finish(level) => {
                    let device = transition.device;
                    let intensity = transition.target_intensity;
                    hw.write_level(device, level);
                    shared.set_intensity(device, intensity);
                    shared.mark_changed(device);
                    self.transition = None;
                    log::debug!("device {}: reached {}", device, intensity);
                    return Some(device);
                }
            }
        }
    }
}
