//! avdloc - Android preference and AVD folder resolution
//!
//! Locates the per-user `.android` folder and the folder holding the
//! user's Android Virtual Devices, keeping AVDs of independent SDK
//! installations apart when they share one home.
//!
//! ## Architecture
//!
//! - `avdloc-core`: errors, configuration and the properties format
//! - `avdloc-locator`: candidate sources, folder resolution and AVD ownership checks

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use avdloc_core as core;
pub use avdloc_locator as locator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use avdloc_core::{LocationError, LocatorConfig};
    pub use avdloc_locator::{AndroidLocation, Environment, SdkHandler, SdkLocation};
}
