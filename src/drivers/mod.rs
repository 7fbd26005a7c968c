//! Peripheral drivers, hardware initialisation and core pinning.

pub mod digipot;
pub mod hw_init;
pub mod hw_timer;
pub mod led_pwm;
pub mod task_pin;
