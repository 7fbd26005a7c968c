//! Lightbridge firmware entry point
//!
//! Two pinned loops sharing one static [`SharedState`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Adapters (outer ring)                      │
//! │   GatewayUart (SerialPort)      HardwareAdapter (Actuator+Sensor)│
//! │   MonotonicClock (Clock)                                         │
//! │  ──────────────────── Port Trait Boundary ─────────────────────  │
//! │   IngressCore  ──── CommandChannel ────▶  DeviceCore             │
//! │   (PRO_CPU)    ◀─── SharedState ───────  OutputEngine · Modes    │
//! │  ──────────────────────────────────────────────────────────────  │
//! │   flag timer (esp_timer) ─▶ due flags                            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use lightbridge::adapters::hardware::HardwareAdapter;
use lightbridge::adapters::serial::GatewayUart;
use lightbridge::adapters::time::MonotonicClock;
use lightbridge::config::SystemConfig;
use lightbridge::cores;
use lightbridge::devices::DIGIPOT_DEVICE;
use lightbridge::devices::mapping::max_register;
use lightbridge::drivers::digipot::Digipot;
use lightbridge::drivers::led_pwm::LedPwm;
use lightbridge::drivers::task_pin::{Core, spawn_on_core};
use lightbridge::drivers::{hw_init, hw_timer};
use lightbridge::pins;
use lightbridge::sensors::dht22::Dht22;
use lightbridge::sensors::ldr::LightSensor;
use lightbridge::shared::SharedState;
use lightbridge::timer::{TimerContext, TimerPeriods};

static SHARED: SharedState = SharedState::new();

// Task parameters: (priority, stack KB).
const INGRESS_TASK: (u8, usize) = (5, 8);
const DEVICE_TASK: (u8, usize) = (6, 8);
const INGRESS_IDLE: Duration = Duration::from_millis(1);
const BANNER_TITLE: &str = concat!("Lightbridge v", env!("CARGO_PKG_VERSION"));

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap + logging ────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  {:<36}║", BANNER_TITLE);
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config: {e}"))?;
    let wrap_point = config.wrap_point();
    info!(
        "PWM {} Hz -> wrap point {}, step delay {} ms",
        config.pwm_frequency_hz, wrap_point, config.step_delay_ms
    );

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(config.pwm_frequency_hz)
        .map_err(|e| anyhow::anyhow!("HAL init failed: {e}"))?;

    let (spi, serial) = bring_up_buses(&config)?;
    let digipot_scale =
        max_register(wrap_point, config.device_sensitivity_percent[DIGIPOT_DEVICE]);
    let hardware = HardwareAdapter::new(
        LedPwm::new(hw_init::LEDC_CH_LED, wrap_point as u16),
        Digipot::new(spi, digipot_scale),
        Dht22::new(pins::DHT_GPIO),
        LightSensor::new(),
    );

    // ── 4. Flag timer ─────────────────────────────────────────
    let timer_ctx: &'static TimerContext = Box::leak(Box::new(TimerContext {
        shared: &SHARED,
        periods: TimerPeriods::from_config(&config),
    }));
    hw_timer::start_periodic(timer_ctx, config.timer_period_ms)?;

    // ── 5. Core loops ─────────────────────────────────────────
    let ingress = spawn_on_core(
        Core::Ingress,
        INGRESS_TASK.0,
        INGRESS_TASK.1,
        "ingress\0",
        move || cores::run_ingress(&SHARED, serial, INGRESS_IDLE),
    )
    .context("spawn ingress loop")?;

    let device_config = config.clone();
    let device = spawn_on_core(
        Core::Device,
        DEVICE_TASK.0,
        DEVICE_TASK.1,
        "device\0",
        move || cores::run_device(&SHARED, &device_config, hardware, MonotonicClock::new()),
    )
    .context("spawn device loop")?;

    info!("Both core loops started");
    // Neither loop returns; a join only completes if a loop thread panicked.
    if ingress.join().is_err() || device.join().is_err() {
        anyhow::bail!("core loop terminated");
    }
    Ok(())
}

// ── Configuration loading ─────────────────────────────────────

/// Compiled-in defaults, overridden on host by the JSON file named in
/// `LIGHTBRIDGE_CONFIG`.
fn load_config() -> SystemConfig {
    let Ok(path) = std::env::var("LIGHTBRIDGE_CONFIG") else {
        info!("Config: defaults");
        return SystemConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(doc) => match SystemConfig::from_json(&doc) {
            Ok(cfg) => {
                info!("Config loaded from {}", path);
                cfg
            }
            Err(e) => {
                warn!("Config {} rejected ({}), using defaults", path, e);
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("Config {} unreadable ({}), using defaults", path, e);
            SystemConfig::default()
        }
    }
}

// ── Bus bring-up ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn bring_up_buses(
    config: &SystemConfig,
) -> Result<(
    esp_idf_hal::spi::SpiDeviceDriver<'static, esp_idf_hal::spi::SpiDriver<'static>>,
    GatewayUart,
)> {
    use esp_idf_hal::gpio::AnyIOPin;
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriverConfig};
    use esp_idf_hal::uart::UartDriver;
    use esp_idf_hal::units::Hertz;

    let peripherals = Peripherals::take()?;

    // Pin fields must match `pins`: SCLK 12, MOSI 11, CS 10, TX 17, RX 18.
    let spi_config = esp_idf_hal::spi::config::Config::new()
        .baudrate(Hertz(pins::SPI_BAUD_HZ))
        .data_mode(embedded_hal::spi::MODE_0);
    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        peripherals.pins.gpio12,
        peripherals.pins.gpio11,
        Option::<AnyIOPin>::None,
        Some(peripherals.pins.gpio10),
        &SpiDriverConfig::default(),
        &spi_config,
    )?;
    info!("SPI2 up (digipot)");

    let uart_config = esp_idf_hal::uart::config::Config::default().baudrate(Hertz(config.uart_baud));
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )?;
    info!("UART1 up at {} baud (gateway)", config.uart_baud);

    Ok((spi, GatewayUart::new(uart)))
}

#[cfg(not(target_os = "espidf"))]
fn bring_up_buses(
    config: &SystemConfig,
) -> Result<(lightbridge::drivers::digipot::SimSpi, GatewayUart)> {
    info!("sim: SPI recorder, stdio gateway ({} baud ignored)", config.uart_baud);
    let serial = GatewayUart::stdio().context("stdin reader")?;
    Ok((lightbridge::drivers::digipot::SimSpi::default(), serial))
}
