#![cfg_attr(not(feature = "std"), no_std)]

//! # Saver Core
//!
//! Arcade-cabinet power saver core logic library for embedded systems.
//! Switches the cabinet load off through a relay after a knob-calibrated
//! period of inactivity and back on when a control is touched.

pub mod calibration;
pub mod controller;
pub mod fsm;
pub mod hal;
pub mod scheduler;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use calibration::*;
pub use controller::*;
pub use fsm::*;
pub use hal::*;
pub use scheduler::*;
pub use types::*;

/// Saver library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration matching the reference cabinet hardware
pub fn default_config() -> SaverConfig {
    SaverConfig {
        policy: ActivityPolicy::AnyEdge,
        tick_hz: TICK_HZ,
        warmup_reads: ADC_WARMUP_READS,
        conversion_poll_budget: 1_000_000,
    }
}
