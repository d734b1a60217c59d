//! Third-person character sandbox.
//!
//! This library exposes the pieces shared by the game binary and the headless
//! controller trace.

pub mod settings;
pub mod telemetry;
