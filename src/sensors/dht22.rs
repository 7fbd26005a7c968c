//! DHT22 humidity/temperature sensor on a single-wire GPIO.
//!
//! Frame: 40 bits, MSB first: humidity (16 bits, ×10), temperature
//! (15 bits ×10 plus sign bit), checksum (low byte of the sum of the first
//! four bytes). A `1` bit is a high pulse longer than ~40 µs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged on an open-drain GPIO with interrupts masked
//! during the 4 ms frame.
//! On host/test: returns values injected with [`sim_set_dht`].

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::SensorError;

static SIM_HUMIDITY: AtomicU32 = AtomicU32::new(0);
static SIM_TEMPERATURE: AtomicU32 = AtomicU32::new(0);
static SIM_VALID: AtomicBool = AtomicBool::new(false);

/// Inject the next simulated reading; `None` makes reads fail.
pub fn sim_set_dht(reading: Option<DhtReading>) {
    match reading {
        Some(r) => {
            SIM_HUMIDITY.store(r.humidity.to_bits(), Ordering::Relaxed);
            SIM_TEMPERATURE.store(r.temperature_c.to_bits(), Ordering::Relaxed);
            SIM_VALID.store(true, Ordering::Release);
        }
        None => SIM_VALID.store(false, Ordering::Release),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtReading {
    /// Relative humidity, %RH.
    pub humidity: f32,
    pub temperature_c: f32,
}

/// Decode and checksum a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<DhtReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }
    let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
    let magnitude = f32::from(u16::from_be_bytes([frame[2] & 0x7F, frame[3]])) / 10.0;
    let temperature_c = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    Ok(DhtReading {
        humidity,
        temperature_c,
    })
}

pub struct Dht22 {
    _gpio: i32,
}

impl Dht22 {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> Result<DhtReading, SensorError> {
        let frame = esp_impl::read_frame(self._gpio)?;
        decode_frame(frame)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> Result<DhtReading, SensorError> {
        if !SIM_VALID.load(Ordering::Acquire) {
            return Err(SensorError::NoResponse);
        }
        Ok(DhtReading {
            humidity: f32::from_bits(SIM_HUMIDITY.load(Ordering::Relaxed)),
            temperature_c: f32::from_bits(SIM_TEMPERATURE.load(Ordering::Relaxed)),
        })
    }
}

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_svc::sys::{esp_rom_delay_us, esp_timer_get_time, gpio_get_level, gpio_set_level};

    use crate::error::SensorError;

    /// Host start signal: hold the line low for at least 1 ms.
    const START_LOW_US: u32 = 1_100;
    const RESPONSE_TIMEOUT_US: i64 = 100;
    const BIT_TIMEOUT_US: i64 = 100;
    /// High pulses longer than this are `1` bits (0 ≈ 26 µs, 1 ≈ 70 µs).
    const ONE_THRESHOLD_US: i64 = 40;

    /// Microseconds the line stayed at `level`.
    fn pulse_while(pin: i32, level: i32, timeout_us: i64) -> Result<i64, SensorError> {
        // SAFETY: esp_timer_get_time and gpio_get_level are register reads;
        // the pin is configured input/output open-drain by hw_init.
        let start = unsafe { esp_timer_get_time() };
        loop {
            let elapsed = unsafe { esp_timer_get_time() } - start;
            if unsafe { gpio_get_level(pin) } != level {
                return Ok(elapsed);
            }
            if elapsed > timeout_us {
                return Err(SensorError::Timing);
            }
        }
    }

    pub fn read_frame(pin: i32) -> Result<[u8; 5], SensorError> {
        // SAFETY: open-drain writes on the DHT pin only; device core owns it.
        unsafe {
            gpio_set_level(pin, 0);
            esp_rom_delay_us(START_LOW_US);
            gpio_set_level(pin, 1);
        }

        esp_idf_hal::interrupt::free(|| {
            // Sensor acknowledges: pulls low ~80 µs, then high ~80 µs.
            pulse_while(pin, 1, RESPONSE_TIMEOUT_US).map_err(|_| SensorError::NoResponse)?;
            pulse_while(pin, 0, RESPONSE_TIMEOUT_US).map_err(|_| SensorError::NoResponse)?;
            pulse_while(pin, 1, RESPONSE_TIMEOUT_US).map_err(|_| SensorError::NoResponse)?;

            let mut frame = [0u8; 5];
            for bit in 0..40 {
                pulse_while(pin, 0, BIT_TIMEOUT_US)?;
                let high = pulse_while(pin, 1, BIT_TIMEOUT_US)?;
                if high > ONE_THRESHOLD_US {
                    frame[bit / 8] |= 0x80 >> (bit % 8);
                }
            }
            Ok(frame)
        })
    }
}
