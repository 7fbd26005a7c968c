//! SPI digital potentiometer (single wiper, 7-bit).
//!
//! A write is two bytes, `[REG_ADDR & 0x7F, wiper]`, framed by chip select;
//! the MSB of the first byte clear marks a write. Generic over any
//! `embedded_hal::spi::SpiDevice`, which owns CS.

use embedded_hal::spi::SpiDevice;

/// Wiper register address.
pub const REG_ADDR: u8 = 0x00;

/// Highest wiper position.
pub const WIPER_MAX: u8 = 0x7F;

pub struct Digipot<SPI> {
    spi: SPI,
    /// Register value that maps to [`WIPER_MAX`].
    full_scale: u32,
}

impl<SPI: SpiDevice> Digipot<SPI> {
    pub fn new(spi: SPI, full_scale: u32) -> Self {
        Self {
            spi,
            full_scale: full_scale.max(1),
        }
    }

    pub fn write_wiper(&mut self, wiper: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[REG_ADDR & 0x7F, wiper.min(WIPER_MAX)])
    }

    /// Write a register-scale level (0..=full_scale).
    pub fn set_level(&mut self, level: u32) -> Result<(), SPI::Error> {
        self.write_wiper(wiper_for(level, self.full_scale))
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

/// Scale a register level onto the wiper range.
pub fn wiper_for(level: u32, full_scale: u32) -> u8 {
    let level = level.min(full_scale);
    (level * u32::from(WIPER_MAX) / full_scale.max(1)) as u8
}

// ── Simulation SPI device ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::SimSpi;

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::convert::Infallible;

    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    /// Records every write frame.
    #[derive(Debug, Default)]
    pub struct SimSpi {
        pub frames: Vec<Vec<u8>>,
    }

    impl ErrorType for SimSpi {
        type Error = Infallible;
    }

    impl SpiDevice for SimSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            let mut frame = Vec::new();
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    frame.extend_from_slice(bytes);
                }
            }
            self.frames.push(frame);
            Ok(())
        }
    }
}
