//! Gateway serial adapter.
//!
//! - **`target_os = "espidf"`**: wraps the ESP-IDF UART driver wired to the
//!   Wemos gateway; reads never block.
//! - **`not(target_os = "espidf")`**: stdin/stdout, so the simulation binary
//!   can be driven by hand or piped a script of protocol lines.

use crate::app::ports::SerialPort;

#[cfg(target_os = "espidf")]
pub struct GatewayUart {
    uart: esp_idf_hal::uart::UartDriver<'static>,
}

#[cfg(target_os = "espidf")]
impl GatewayUart {
    pub fn new(uart: esp_idf_hal::uart::UartDriver<'static>) -> Self {
        Self { uart }
    }
}

#[cfg(target_os = "espidf")]
impl SerialPort for GatewayUart {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte, esp_idf_hal::delay::NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) => {
                log::warn!("uart: read failed: {:?}", e);
                None
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        let result = self
            .uart
            .write(line.as_bytes())
            .and_then(|_| self.uart.write(b"\n"));
        if let Err(e) = result {
            log::warn!("uart: write failed: {:?}", e);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct GatewayUart {
    rx: std::sync::mpsc::Receiver<u8>,
}

#[cfg(not(target_os = "espidf"))]
impl GatewayUart {
    /// Spawn a reader thread that forwards stdin bytes.
    pub fn stdio() -> std::io::Result<Self> {
        use std::io::Read;

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::Builder::new()
            .name("uart-rx(sim)".into())
            .spawn(move || {
                for byte in std::io::stdin().lock().bytes() {
                    match byte {
                        Ok(b) if tx.send(b).is_ok() => {}
                        _ => break,
                    }
                }
                log::info!("uart(sim): stdin closed");
            })?;
        Ok(Self { rx })
    }
}

#[cfg(not(target_os = "espidf"))]
impl SerialPort for GatewayUart {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.try_recv().ok()
    }

    fn write_line(&mut self, line: &str) {
        use std::io::Write;

        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            log::warn!("uart(sim): write failed: {}", e);
        }
    }
}
