//! Ingress core (PRO_CPU): gateway UART in, command words out, telemetry back.
//!
//! Each [`IngressCore::poll`] pass:
//!
//! 1. drains received bytes into the line assembler; every complete line
//!    is echoed as a comment, then parsed and forwarded to the channel
//! 2. publishes all sensor values when the publish flag is up and the
//!    device core is not mid-write
//! 3. reports every device whose intensity changed
//! 4. reports a service denial once

use crate::app::ports::SerialPort;
use crate::devices::DEVICE_COUNT;
use crate::modes::MODE_OFF;
use crate::protocol::Command;
use crate::protocol::line::{self, CommentSource, Inbound, LineAssembler};
use crate::sensors::SENSOR_COUNT;
use crate::shared::SharedState;

pub const SERVICE_DENIED: &str = "service denied";
pub const BOOT_BANNER: &str = "mcu online";

pub struct IngressCore<'a> {
    shared: &'a SharedState,
    assembler: LineAssembler,
}

impl<'a> IngressCore<'a> {
    pub fn new(shared: &'a SharedState) -> Self {
        Self {
            shared,
            assembler: LineAssembler::new(),
        }
    }

    pub fn announce(&self, serial: &mut impl SerialPort) {
        serial.write_line(&line::comment_line(CommentSource::Mcu, BOOT_BANNER));
    }

    /// One pass of the ingress loop.
    pub fn poll(&mut self, serial: &mut impl SerialPort) {
        let shared = self.shared;
        while let Some(byte) = serial.read_byte() {
            if let Some(text) = self.assembler.push(byte) {
                handle_line(shared, serial, text);
            }
        }

        self.publish_sensors(serial);
        self.report_changes(serial);

        if shared.channel.take_denied() {
            serial.write_line(&line::comment_line(CommentSource::Mcu, SERVICE_DENIED));
        }
    }

    fn publish_sensors(&self, serial: &mut impl SerialPort) {
        if !self.shared.publish_due() || self.shared.sensor_write_in_progress() {
            return;
        }
        for index in 0..SENSOR_COUNT {
            serial.write_line(&line::sensor_line(index, self.shared.sensor(index)));
        }
        self.shared.clear_publish_due();
    }

    fn report_changes(&self, serial: &mut impl SerialPort) {
        let changed = self.shared.take_changed();
        for device in (0..DEVICE_COUNT).filter(|d| changed & (1 << d) != 0) {
            serial.write_line(&line::device_line(device, self.shared.intensity(device)));
        }
    }
}

fn handle_line(shared: &SharedState, serial: &mut impl SerialPort, text: &str) {
    serial.write_line(&line::comment_line(CommentSource::Mcu, text));

    let command = match line::parse_inbound(text) {
        Some(Inbound::Device { index, value }) => {
            let mode = shared.mode(usize::from(index));
            if mode != MODE_OFF {
                log::debug!("ingress: D{} ignored, mode {} active", index, mode);
                return;
            }
            Command::output(index, value)
        }
        Some(Inbound::Mode { index, value }) => Command::mode(index, value),
        None => {
            log::debug!("ingress: ignored line {:?}", text);
            return;
        }
    };

    match command.to_word() {
        Ok(word) => {
            if shared.channel.send(word) {
                log::debug!("ingress: sent {:?} as 0x{:08X}", command, word);
            }
        }
        Err(e) => log::warn!("ingress: dropped {:?}: {}", command, e),
    }
}
