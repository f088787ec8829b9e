//! Installation marker (`sdk.info`)
//!
//! Records which SDK installation owns an AVD folder. Failures are logged
//! and reported as "no marker" so resolution can fall back to scanning.

use std::path::{Path, PathBuf};

use avdloc_core::Properties;
use tracing::{debug, error};

/// Marker file name inside an AVD folder
pub const SDK_INFO_FILE: &str = "sdk.info";

/// Key holding the owning installation's absolute path
pub const SDK_LOCATION_KEY: &str = "SDK_LOCATION";

const MARKER_COMMENT: &str = "Created by avdloc. Do not modify!";

pub fn marker_path(avd_location: &Path) -> PathBuf {
    avd_location.join(SDK_INFO_FILE)
}

pub fn has_marker(avd_location: &Path) -> bool {
    marker_path(avd_location).exists()
}

/// Read the recorded installation path, `None` when absent, unreadable or empty
pub fn read_marker(avd_location: &Path) -> Option<PathBuf> {
    let path = marker_path(avd_location);
    if !path.exists() {
        return None;
    }

    let properties = match Properties::load(&path) {
        Ok(properties) => properties,
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            return None;
        }
    };

    match properties.get(SDK_LOCATION_KEY) {
        Some(location) if !location.is_empty() => Some(PathBuf::from(location)),
        _ => {
            debug!("{:?} has no {}", path, SDK_LOCATION_KEY);
            None
        }
    }
}

/// Record `sdk_location` as the owner of `avd_location`
pub fn write_marker(avd_location: &Path, sdk_location: &Path) {
    let path = marker_path(avd_location);
    let mut properties = Properties::new();
    properties.set(SDK_LOCATION_KEY, sdk_location.to_string_lossy());

    match properties.store(&path, MARKER_COMMENT) {
        Ok(()) => debug!("Marked {:?} as owned by {:?}", avd_location, sdk_location),
        Err(e) => error!("Failed to write {:?}: {}", path, e),
    }
}
