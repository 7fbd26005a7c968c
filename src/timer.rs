//! Periodic timer callback: schedules sensor reads and telemetry publishes.
//!
//! The callback is O(1) and only raises flags in [`SharedState`]; the core
//! loops do the work.

use crate::config::SystemConfig;
use crate::shared::SharedState;

/// Flag periods in timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPeriods {
    pub dht_ticks: u32,
    pub ldr_ticks: u32,
    pub publish_ticks: u32,
}

impl TimerPeriods {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            dht_ticks: config.dht_read_period_ticks.max(1),
            ldr_ticks: config.ldr_read_period_ticks.max(1),
            publish_ticks: config.publish_period_ticks.max(1),
        }
    }
}

/// Everything the timer callback touches.
pub struct TimerContext {
    pub shared: &'static SharedState,
    pub periods: TimerPeriods,
}

/// One timer period elapsed.
pub fn on_timer_tick(shared: &SharedState, periods: &TimerPeriods) {
    let count = shared.bump_timer_count();
    if count % periods.dht_ticks == 0 {
        shared.raise_dht_due();
    }
    if count % periods.ldr_ticks == 0 {
        shared.raise_ldr_due();
    }
    if count % periods.publish_ticks == 0 {
        shared.raise_publish_due();
    }
}
