//! Mode/policy engine.
//!
//! Each device has an active mode id (0 = inactive) and a fixed pair of
//! policies: an operation mode run continuously while the device is in
//! [`MODE_AUTO`], and a shutdown policy run whenever its mode is set to
//! [`MODE_OFF`].
//!
//! | Device | Operation         | Shutdown             |
//! |--------|-------------------|----------------------|
//! | 0 LED  | `LightResponsive` | `LightResponsiveOff` |
//! | 1 pot  | `Idle`            | `NoOp`               |

pub mod light;

use crate::config::SystemConfig;
use crate::devices::{DEVICE_COUNT, OutputEngine};
use crate::error::DeviceError;
use crate::sensors::LIGHT_SENSOR;
use crate::shared::SharedState;

use light::LightResponsiveController;

pub const MODE_OFF: u16 = 0;
/// The only mode id with continuous behaviour. Other non-zero ids mark the
/// device active (and so reject direct output) without running anything.
pub const MODE_AUTO: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    Idle,
    LightResponsive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    NoOp,
    LightResponsiveOff,
}

#[derive(Debug, Clone, Copy)]
pub struct DevicePolicy {
    pub operation: OperationMode,
    pub shutdown: ShutdownPolicy,
}

pub const POLICY_TABLE: [DevicePolicy; DEVICE_COUNT] = [
    DevicePolicy {
        operation: OperationMode::LightResponsive,
        shutdown: ShutdownPolicy::LightResponsiveOff,
    },
    DevicePolicy {
        operation: OperationMode::Idle,
        shutdown: ShutdownPolicy::NoOp,
    },
];

/// What a `set_mode` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeOutcome {
    /// Shutdown policy that ran, if the new mode was [`MODE_OFF`].
    pub shutdown: Option<ShutdownPolicy>,
    /// The shutdown policy started an output transition.
    pub transition_started: bool,
}

pub struct ModeEngine {
    light: LightResponsiveController,
}

impl ModeEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            light: LightResponsiveController::new(config),
        }
    }

    pub fn light(&self) -> &LightResponsiveController {
        &self.light
    }

    /// Store a device's mode and refresh the "any mode active" flag.
    ///
    /// Setting [`MODE_OFF`] runs the shutdown policy on every call, also
    /// when the device was already inactive.
    pub fn set_mode(
        &mut self,
        device: usize,
        mode: u16,
        outputs: &mut OutputEngine,
        shared: &SharedState,
        now_ms: u64,
    ) -> Result<ModeOutcome, DeviceError> {
        let policy = POLICY_TABLE
            .get(device)
            .ok_or(DeviceError::IndexOutOfRange(device))?;

        let previous = shared.mode(device);
        shared.set_mode(device, mode);
        let active = (0..DEVICE_COUNT).any(|d| shared.mode(d) != MODE_OFF);
        shared.set_modes_active(active);
        if previous != mode {
            log::info!("device {}: mode {} -> {}", device, previous, mode);
        }

        if mode != MODE_OFF {
            return Ok(ModeOutcome {
                shutdown: None,
                transition_started: false,
            });
        }

        let transition_started = self.run_shutdown(policy.shutdown, outputs, shared, now_ms)?;
        Ok(ModeOutcome {
            shutdown: Some(policy.shutdown),
            transition_started,
        })
    }

    /// Run one step of every device's operation mode that is in
    /// [`MODE_AUTO`]. Stops at the first policy that starts a transition.
    pub fn run_active(
        &mut self,
        outputs: &mut OutputEngine,
        shared: &SharedState,
        now_ms: u64,
    ) -> Result<bool, DeviceError> {
        if !shared.modes_active() {
            return Ok(false);
        }
        for (device, policy) in POLICY_TABLE.iter().enumerate() {
            if shared.mode(device) != MODE_AUTO {
                continue;
            }
            if self.run_operation(policy.operation, outputs, shared, now_ms)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn run_operation(
        &mut self,
        mode: OperationMode,
        outputs: &mut OutputEngine,
        shared: &SharedState,
        now_ms: u64,
    ) -> Result<bool, DeviceError> {
        match mode {
            OperationMode::Idle => Ok(false),
            OperationMode::LightResponsive => {
                let reading = shared.sensor(LIGHT_SENSOR);
                self.light.tick(reading, outputs, shared, now_ms)
            }
        }
    }

    fn run_shutdown(
        &mut self,
        policy: ShutdownPolicy,
        outputs: &mut OutputEngine,
        shared: &SharedState,
        now_ms: u64,
    ) -> Result<bool, DeviceError> {
        log::debug!("shutdown policy {:?}", policy);
        match policy {
            ShutdownPolicy::NoOp => Ok(false),
            ShutdownPolicy::LightResponsiveOff => self.light.shutdown(outputs, shared, now_ms),
        }
    }
}
