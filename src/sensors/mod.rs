//! Sensor subsystem: drivers plus the sampling step that publishes readings
//! into [`SharedState`].
//!
//! | Index | Quantity          | Source |
//! |-------|-------------------|--------|
//! | 0     | humidity (%RH)    | DHT22  |
//! | 1     | temperature (°C)  | DHT22  |
//! | 2     | light level 0-100 | LDR    |

pub mod dht22;
pub mod ldr;

use crate::app::ports::SensorPort;
use crate::shared::SharedState;

pub use dht22::DhtReading;

pub const SENSOR_COUNT: usize = 3;

pub const HUMIDITY_SENSOR: usize = 0;
pub const TEMPERATURE_SENSOR: usize = 1;
pub const LIGHT_SENSOR: usize = 2;

/// Read the DHT22 and publish both values.
///
/// An invalid read keeps the previous values. Returns whether new values
/// were stored.
pub fn sample_dht(port: &mut impl SensorPort, shared: &SharedState) -> bool {
    match port.read_dht() {
        Ok(reading) => {
            shared.begin_sensor_write();
            shared.set_sensor(HUMIDITY_SENSOR, reading.humidity);
            shared.set_sensor(TEMPERATURE_SENSOR, reading.temperature_c);
            shared.end_sensor_write();
            log::debug!(
                "dht22: {:.1} %RH, {:.1} C",
                reading.humidity,
                reading.temperature_c
            );
            true
        }
        Err(e) => {
            log::warn!("dht22: read failed ({}), keeping previous values", e);
            false
        }
    }
}

/// Sample the LDR, publish and return the 0-100 level.
pub fn sample_light(port: &mut impl SensorPort, shared: &SharedState) -> f32 {
    let level = ldr::level_from_raw(port.read_light_raw());
    shared.begin_sensor_write();
    shared.set_sensor(LIGHT_SENSOR, level);
    shared.end_sensor_write();
    level
}
