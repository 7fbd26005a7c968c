//! GPIO / peripheral pin assignments for the lightbridge board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Dimmable LED (MOSFET gate on LEDC)
// ---------------------------------------------------------------------------

pub const LED_PWM_GPIO: i32 = 4;
/// LEDC duty resolution. 11 bits covers the 2000-count wrap at 20 kHz.
pub const LED_PWM_RESOLUTION_BITS: u32 = 11;

// ---------------------------------------------------------------------------
// Digipot (MCP41xx-style, SPI2)
// ---------------------------------------------------------------------------

pub const SPI_SCLK_GPIO: i32 = 12;
pub const SPI_MOSI_GPIO: i32 = 11;
pub const SPI_CS_GPIO: i32 = 10;
pub const SPI_BAUD_HZ: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// LDR voltage divider, ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const LDR_ADC_GPIO: i32 = 5;

/// DHT22 single-wire data line (open drain, external 10 kΩ pull-up).
pub const DHT_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Gateway UART (Wemos D1 Mini)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
