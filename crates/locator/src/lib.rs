//! Android Folder Location
//!
//! Resolves:
//! - The per-user preference folder (`~/.android/`)
//! - The legacy AVD folder (`~/.android/avd/`)
//! - Per-installation AVD folders when several SDKs share one home

pub mod env;
pub mod location;
pub mod marker;
pub mod scan;
pub mod sdk;
pub mod source;

pub use env::Environment;
pub use location::{
    hashed_folder_name, java_string_hash, AndroidLocation, FOLDER_AVD, FOLDER_DOT_ANDROID,
    HASHED_AVD_PREFIX,
};
pub use marker::{SDK_INFO_FILE, SDK_LOCATION_KEY};
pub use scan::{ScanOutcome, DESCRIPTOR_FILES, OWNERSHIP_KEYS};
pub use sdk::{SdkHandler, SdkLocation};
pub use source::{find_valid_path, CandidateSource, CheckMode, PathCheck};
