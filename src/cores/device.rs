//! Device core (APP_CPU): sensors, output transitions, modes.
//!
//! The loop is flag-driven. One [`DeviceCore::poll`] pass:
//!
//! 1. services the channel doorbell (drain, decode, pending or denied)
//! 2. runs any due sensor reads
//! 3. when no transition is running, dispatches the pending command, or
//!    else runs one step of every active mode
//! 4. advances the running transition
//! 5. acknowledges the dispatched command once its transition is over
//!
//! Output commands for a device in an operation mode are dropped here as
//! well as at ingress, since the ingress check may predate the mode change.
//!
//! Only one transition runs at a time, so a command that arrives while the
//! LED is ramping waits in the slot; anything newer is denied.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::channel::Delivery;
use crate::config::SystemConfig;
use crate::devices::{DEVICE_COUNT, OutputEngine};
use crate::error::{DeviceError, Error};
use crate::modes::{MODE_OFF, ModeEngine};
use crate::protocol::{Command, CommandKind};
use crate::sensors;
use crate::shared::SharedState;

pub struct DeviceCore<'a> {
    shared: &'a SharedState,
    outputs: OutputEngine,
    modes: ModeEngine,
    /// The pending command was applied; acknowledge when idle.
    awaiting_ack: bool,
}

impl<'a> DeviceCore<'a> {
    pub fn new(shared: &'a SharedState, config: &SystemConfig) -> Self {
        Self {
            shared,
            outputs: OutputEngine::new(config),
            modes: ModeEngine::new(config),
            awaiting_ack: false,
        }
    }

    pub fn outputs(&self) -> &OutputEngine {
        &self.outputs
    }

    pub fn modes(&self) -> &ModeEngine {
        &self.modes
    }

    /// One pass of the device loop.
    pub fn poll<HW>(&mut self, now_ms: u64, hw: &mut HW)
    where
        HW: ActuatorPort + SensorPort,
    {
        let shared = self.shared;

        if let Some(delivery) = shared.channel.service_doorbell() {
            match delivery {
                Delivery::Accepted(cmd) => log::debug!("device: accepted {:?}", cmd),
                Delivery::Denied => log::debug!("device: busy, word denied"),
                Delivery::Empty => {}
            }
        }

        if shared.take_dht_due() {
            sensors::sample_dht(hw, shared);
        }
        if shared.take_ldr_due() {
            sensors::sample_light(hw, shared);
        }

        if !self.outputs.is_busy() {
            if let Some(cmd) = shared.channel.pending() {
                if let Err(e) = self.dispatch(cmd, now_ms) {
                    log::warn!("device: dropped {:?}: {}", cmd, e);
                }
                self.awaiting_ack = true;
            } else if let Err(e) = self.modes.run_active(&mut self.outputs, shared, now_ms) {
                log::warn!("device: mode step failed: {}", e);
            }
        }

        if let Some(device) = self.outputs.tick(now_ms, hw, shared) {
            log::debug!("device: transition on {} complete", device);
        }

        if self.awaiting_ack && !self.outputs.is_busy() {
            shared.channel.acknowledge();
            self.awaiting_ack = false;
        }
    }

    fn dispatch(&mut self, cmd: Command, now_ms: u64) -> Result<(), Error> {
        let device = usize::from(cmd.device_index);
        if device >= DEVICE_COUNT {
            return Err(DeviceError::IndexOutOfRange(device).into());
        }
        match cmd.kind {
            CommandKind::Output => {
                if self.shared.mode(device) != MODE_OFF {
                    return Err(DeviceError::ModeActive(device).into());
                }
                self.outputs
                    .set_output(device, cmd.value, now_ms, self.shared)?;
            }
            CommandKind::Mode => {
                self.modes
                    .set_mode(device, cmd.value, &mut self.outputs, self.shared, now_ms)?;
            }
        }
        Ok(())
    }
}
