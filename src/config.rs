//! System configuration parameters
//!
//! All tunable parameters for the bridge firmware. Defaults are compiled
//! in; a JSON override document can replace any subset of them.

use serde::{Deserialize, Serialize};

use crate::devices::DEVICE_COUNT;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- PWM / transitions ---
    /// LED PWM operating frequency (Hz). Determines the wrap point.
    pub pwm_frequency_hz: u32,
    /// Delay before each one-unit register step (milliseconds).
    pub step_delay_ms: u32,
    /// Per-device share of the duty-cycle range that is visibly linear (1-100%).
    pub device_sensitivity_percent: [u8; DEVICE_COUNT],

    // --- Light-responsive mode ---
    /// Light level above which the LED is switched fully down.
    pub ldr_daylight_threshold: f32,
    /// Light level below which the LED is driven fully up.
    pub ldr_dark_threshold: f32,
    /// Dead band around the anchor reading.
    pub ldr_delta: f32,
    /// LED intensity used in daylight and on shutdown.
    pub led_min_intensity: u8,
    /// LED intensity used in the dark.
    pub led_max_intensity: u8,

    // --- Timing ---
    /// Periodic timer interval (milliseconds).
    pub timer_period_ms: u32,
    /// DHT22 read every N timer ticks (the sensor needs >= 2 s between reads).
    pub dht_read_period_ticks: u32,
    /// LDR read every N timer ticks.
    pub ldr_read_period_ticks: u32,
    /// Sensor telemetry publish every N timer ticks.
    pub publish_period_ticks: u32,
    /// Device core idle time per loop iteration (milliseconds).
    pub device_loop_idle_ms: u32,

    // --- Gateway link ---
    pub uart_baud: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // PWM
            pwm_frequency_hz: 20_000,
            step_delay_ms: 1,
            device_sensitivity_percent: [40, 100],

            // Light-responsive mode
            ldr_daylight_threshold: 40.0,
            ldr_dark_threshold: 4.0,
            ldr_delta: 2.0,
            led_min_intensity: 0,
            led_max_intensity: 100,

            // Timing
            timer_period_ms: 500,
            dht_read_period_ticks: 4, // 2 s
            ldr_read_period_ticks: 1,
            publish_period_ticks: 10, // 5 s
            device_loop_idle_ms: 1,

            uart_baud: 115_200,
        }
    }
}

/// Errors from loading or validating a [`SystemConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for this schema.
    Malformed,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "config document malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed document"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

impl SystemConfig {
    /// Parse a JSON override document. Missing fields keep their defaults.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc).map_err(|e| {
            log::warn!("config: parse error: {}", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the control loops rather than clamp them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pwm_frequency_hz == 0 {
            return Err(ConfigError::ValidationFailed("pwm_frequency_hz must be > 0"));
        }
        let wrap = crate::devices::mapping::wrap_point_of_freq(self.pwm_frequency_hz);
        if wrap == 0 || wrap > u32::from(u16::MAX) {
            return Err(ConfigError::ValidationFailed(
                "pwm_frequency_hz gives a wrap point outside 1..=65535",
            ));
        }
        if self
            .device_sensitivity_percent
            .iter()
            .any(|&p| p == 0 || p > 100)
        {
            return Err(ConfigError::ValidationFailed(
                "device_sensitivity_percent must be 1-100",
            ));
        }
        if !(self.ldr_dark_threshold < self.ldr_daylight_threshold) {
            return Err(ConfigError::ValidationFailed(
                "ldr_dark_threshold must be below ldr_daylight_threshold",
            ));
        }
        if !(self.ldr_delta >= 0.0) {
            return Err(ConfigError::ValidationFailed("ldr_delta must be >= 0"));
        }
        if self.led_min_intensity > self.led_max_intensity
            || self.led_max_intensity > crate::devices::INTENSITY_MAX
        {
            return Err(ConfigError::ValidationFailed(
                "led intensity bounds must satisfy min <= max <= 100",
            ));
        }
        if self.timer_period_ms == 0
            || self.dht_read_period_ticks == 0
            || self.ldr_read_period_ticks == 0
            || self.publish_period_ticks == 0
        {
            return Err(ConfigError::ValidationFailed("timer periods must be > 0"));
        }
        if self.uart_baud == 0 {
            return Err(ConfigError::ValidationFailed("uart_baud must be > 0"));
        }
        Ok(())
    }

    /// Wrap point derived from the PWM frequency.
    pub fn wrap_point(&self) -> u32 {
        crate::devices::mapping::wrap_point_of_freq(self.pwm_frequency_hz)
    }
}
