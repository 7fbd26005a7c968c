//! Hardware adapter: bridges the device-core peripherals to port traits.
//!
//! Owns the LED PWM channel, the digipot and both sensors, exposing them
//! through [`ActuatorPort`] and [`SensorPort`]. On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiDevice;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::devices::{DIGIPOT_DEVICE, LED_DEVICE};
use crate::drivers::digipot::Digipot;
use crate::drivers::led_pwm::LedPwm;
use crate::error::SensorError;
use crate::sensors::DhtReading;
use crate::sensors::dht22::Dht22;
use crate::sensors::ldr::LightSensor;

pub struct HardwareAdapter<SPI> {
    led: LedPwm,
    digipot: Digipot<SPI>,
    dht: Dht22,
    ldr: LightSensor,
}

impl<SPI: SpiDevice> HardwareAdapter<SPI> {
    pub fn new(led: LedPwm, digipot: Digipot<SPI>, dht: Dht22, ldr: LightSensor) -> Self {
        Self {
            led,
            digipot,
            dht,
            ldr,
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<SPI: SpiDevice> ActuatorPort for HardwareAdapter<SPI> {
    fn write_level(&mut self, device: usize, level: u32) {
        match device {
            LED_DEVICE => {
                let duty = level.min(u32::from(u16::MAX)) as u16;
                if let Err(e) = self.led.set_duty_cycle(duty) {
                    log::warn!("led: duty write {} failed: {:?}", duty, e);
                }
            }
            DIGIPOT_DEVICE => {
                if let Err(e) = self.digipot.set_level(level) {
                    log::warn!("digipot: write {} failed: {:?}", level, e);
                }
            }
            _ => log::warn!("hardware: no actuator for device {}", device),
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<SPI: SpiDevice> SensorPort for HardwareAdapter<SPI> {
    fn read_dht(&mut self) -> Result<DhtReading, SensorError> {
        self.dht.read()
    }

    fn read_light_raw(&mut self) -> u16 {
        self.ldr.read_raw()
    }
}
