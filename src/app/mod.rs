//! Application boundary.
//!
//! The domain modules (channel, devices, modes, cores) reach hardware only
//! through the **port traits** defined in [`ports`], keeping them fully
//! testable without real peripherals.

pub mod ports;
