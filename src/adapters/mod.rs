//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `hardware` | ActuatorPort | LEDC PWM, SPI digipot       |
//! |            | SensorPort   | DHT22 GPIO, LDR ADC         |
//! | `serial`   | SerialPort   | UART to the gateway         |
//! | `time`     | Clock        | ESP32 system timer          |

pub mod hardware;
pub mod serial;
pub mod time;
