//! The two core loops.
//!
//! ```text
//!   ┌─────────────── PRO_CPU ───────────────┐     ┌─────────────── APP_CPU ───────────────┐
//!   │ UART ─▶ LineAssembler ─▶ parse ─▶ send│────▶│ doorbell ─▶ pending ─▶ Output / Mode  │
//!   │ UART ◀─ D/S/C lines ◀── SharedState ◀─┼─────┤ sensors, transitions, change mask     │
//!   └───────────────────────────────────────┘     └───────────────────────────────────────┘
//! ```

pub mod device;
pub mod ingress;

use std::time::Duration;

use crate::app::ports::{ActuatorPort, Clock, SensorPort, SerialPort};
use crate::config::SystemConfig;
use crate::shared::SharedState;

pub use device::DeviceCore;
pub use ingress::IngressCore;

/// Ingress loop body; never returns.
pub fn run_ingress(shared: &SharedState, mut serial: impl SerialPort, idle: Duration) -> ! {
    let mut core = IngressCore::new(shared);
    core.announce(&mut serial);
    log::info!("ingress core: running");
    loop {
        core.poll(&mut serial);
        std::thread::sleep(idle);
    }
}

/// Device loop body; never returns.
pub fn run_device<HW>(
    shared: &SharedState,
    config: &SystemConfig,
    mut hw: HW,
    clock: impl Clock,
) -> !
where
    HW: ActuatorPort + SensorPort,
{
    let mut core = DeviceCore::new(shared, config);
    let idle = Duration::from_millis(u64::from(config.device_loop_idle_ms));
    log::info!(
        "device core: running (wrap point {}, step {} ms)",
        core.outputs().wrap_point(),
        config.step_delay_ms
    );
    loop {
        core.poll(clock.now_ms(), &mut hw);
        if !idle.is_zero() {
            std::thread::sleep(idle);
        }
    }
}
