//! Host-based integration tests for the cabinet power saver
//!
//! Everything here runs against the mock HAL through the deterministic
//! tick harness; no real time, no hardware.

pub mod calibration_props;
pub mod scenario_tests;
pub mod variant_tests;
