//! avdloc Core - shared types
//!
//! Error type, persistent configuration and the key/value properties
//! format used by the location resolver.

pub mod config;
pub mod error;
pub mod properties;

pub use config::{LocatorConfig, USER_HOME_PROPERTY};
pub use error::{LocationError, Result};
pub use properties::Properties;

/// avdloc version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "avdloc";
