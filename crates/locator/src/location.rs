//! Android Location Resolver
//!
//! Finds the folder used to store Android related files (emulator files,
//! ddms config, debug keystore) and the folder holding the user's AVDs.
//!
//! When several SDK installations share one home, each installation that
//! finds the legacy `avd/` folder owned by another one gets its own
//! `avd_<hash>` folder next to it.

use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use avdloc_core::{LocationError, LocatorConfig, Result};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::env::Environment;
use crate::marker;
use crate::scan::{self, ScanOutcome};
use crate::sdk::{absolute_path, SdkHandler};
use crate::source::{find_valid_path, CandidateSource, CheckMode};

/// Name of the preference folder under the user's home
pub const FOLDER_DOT_ANDROID: &str = ".android";

/// AVD folder inside the preference folder
pub const FOLDER_AVD: &str = "avd";

/// Prefix of the per-installation AVD folders
pub const HASHED_AVD_PREFIX: &str = "avd_";

/// Resolves and caches the preference and AVD folders
#[derive(Debug)]
pub struct AndroidLocation {
    env: Environment,
    mode: CheckMode,
    prefs_location: Mutex<Option<PathBuf>>,
    avd_location: Mutex<Option<PathBuf>>,
}

impl AndroidLocation {
    /// Create a resolver over an explicit environment
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            mode: CheckMode::Silent,
            prefs_location: Mutex::new(None),
            avd_location: Mutex::new(None),
        }
    }

    /// Create a resolver over the process environment and configured properties
    pub fn from_config(config: &LocatorConfig) -> Self {
        let env = Environment::from_process(config.effective_properties());
        let mode = if config.strict_sdk_home {
            CheckMode::Strict
        } else {
            CheckMode::Silent
        };
        Self::new(env).with_check_mode(mode)
    }

    /// How an ANDROID_SDK_HOME pointing at an SDK root is handled during home resolution
    pub fn with_check_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Returns the folder used to store android related files, creating it if needed
    ///
    /// The path is terminated by a separator.
    pub fn folder(&self) -> Result<PathBuf> {
        let location = self.cached_folder()?;

        if !location.exists() {
            std::fs::create_dir_all(&location).map_err(|source| {
                LocationError::DirectoryCreationDenied {
                    path: location.clone(),
                    source,
                }
            })?;
            info!("Created preference folder {:?}", location);
        } else if location.is_file() {
            return Err(LocationError::NotADirectory { path: location });
        }

        Ok(location)
    }

    /// Returns the folder used to store android related files without creating it
    ///
    /// `None` when no folder can be found.
    pub fn folder_without_writes(&self) -> Option<PathBuf> {
        match self.cached_folder() {
            Ok(location) => Some(location),
            Err(e) => {
                debug!("No preference folder: {}", e);
                None
            }
        }
    }

    /// Fails when ANDROID_SDK_HOME points at the root of an SDK
    pub fn check_android_sdk_home(&self) -> Result<()> {
        find_valid_path(&[CandidateSource::AndroidSdkHome], &self.env, CheckMode::Strict)?;
        Ok(())
    }

    /// The user's home folder, without the `.android` suffix
    pub fn user_home_folder(&self) -> Result<Option<PathBuf>> {
        find_valid_path(&CandidateSource::USER_HOME, &self.env, CheckMode::Silent)
    }

    /// Returns the folder where the user's AVDs are stored
    ///
    /// The path is terminated by a separator.
    pub fn avd_folder(&self) -> Result<PathBuf> {
        let mut cached = self.avd_location.lock();
        if let Some(location) = cached.as_ref() {
            return Ok(location.clone());
        }

        let home = match find_valid_path(&[CandidateSource::AndroidAvdHome], &self.env, CheckMode::Silent)? {
            Some(home) => home,
            None => self.folder()?.join(FOLDER_AVD),
        };
        let location = with_trailing_separator(home);
        debug!("AVD folder resolved to {:?}", location);

        *cached = Some(location.clone());
        Ok(location)
    }

    /// The per-installation AVD folder for `sdk`, whether or not it exists
    pub fn avd_folder_with_hash<S: SdkHandler + ?Sized>(&self, sdk: &S) -> Result<PathBuf> {
        let name = hashed_folder_name(&absolute_path(sdk.location()));
        Ok(absolute_path(&self.folder()?.join(name)))
    }

    /// Returns the folder where the AVDs of one SDK installation are stored
    pub fn avd_folder_for<S: SdkHandler + ?Sized>(&self, sdk: &S) -> Result<PathBuf> {
        let sdk_location = absolute_path(sdk.location());
        let hashed = self.avd_folder_with_hash(sdk_location.as_path())?;
        if hashed.exists() {
            debug!("Reusing {:?} for {:?}", hashed, sdk_location);
            return Ok(hashed);
        }

        let avd_location = self.avd_folder()?;
        if !avd_location.exists() {
            // First use adopts the legacy folder
            create_folder(&avd_location);
            marker::write_marker(&avd_location, &sdk_location);
            info!("Claimed {:?} for {:?}", avd_location, sdk_location);
            return Ok(avd_location);
        }

        match marker::read_marker(&avd_location) {
            None => Ok(Self::validate_avds(&avd_location, &sdk_location, &hashed)),
            Some(owner) if owner == sdk_location => Ok(avd_location),
            Some(owner) => {
                info!(
                    "{:?} belongs to {:?}, using {:?} for {:?}",
                    avd_location, owner, hashed, sdk_location
                );
                create_folder(&hashed);
                Ok(hashed)
            }
        }
    }

    /// Decide between the legacy and the hashed AVD folder by scanning devices
    pub fn validate_avds(avd_location: &Path, sdk_location: &Path, hashed: &Path) -> PathBuf {
        match scan::scan_device_dir(avd_location, sdk_location) {
            ScanOutcome::Owned(device) => {
                info!("{:?} belongs to {:?}", device, sdk_location);
                marker::write_marker(avd_location, sdk_location);
                avd_location.to_path_buf()
            }
            ScanOutcome::Foreign => {
                info!(
                    "AVDs in {:?} are not from {:?}, using {:?}",
                    avd_location, sdk_location, hashed
                );
                create_folder(hashed);
                hashed.to_path_buf()
            }
            ScanOutcome::Empty => avd_location.to_path_buf(),
        }
    }

    /// Forget cached folders so the next call searches again
    pub fn reset(&self) {
        *self.avd_location.lock() = None;
        *self.prefs_location.lock() = None;
    }

    fn cached_folder(&self) -> Result<PathBuf> {
        let mut cached = self.prefs_location.lock();
        if let Some(location) = cached.as_ref() {
            return Ok(location.clone());
        }
        let location = self.find_home_folder()?;
        *cached = Some(location.clone());
        Ok(location)
    }

    fn find_home_folder(&self) -> Result<PathBuf> {
        let home = find_valid_path(&CandidateSource::HOME_FOLDER, &self.env, self.mode)?
            .ok_or_else(|| LocationError::HomeNotFound {
                detail: self
                    .env
                    .property(CandidateSource::AndroidSdkHome.name())
                    .unwrap_or("<unset>")
                    .to_string(),
            })?;

        Ok(with_trailing_separator(home.join(FOLDER_DOT_ANDROID)))
    }
}

/// 32-bit string hash over UTF-16 code units (`h = 31 * h + c`)
pub fn java_string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Folder name for an installation: `avd_` plus its path hash, `-` spelled `N`
pub fn hashed_folder_name(sdk_location: &Path) -> String {
    let hash = java_string_hash(&sdk_location.to_string_lossy());
    format!("{}{}", HASHED_AVD_PREFIX, hash.to_string().replace('-', "N"))
}

fn with_trailing_separator(path: PathBuf) -> PathBuf {
    let mut raw = path.into_os_string();
    if !raw.to_string_lossy().ends_with(MAIN_SEPARATOR) {
        raw.push(MAIN_SEPARATOR_STR);
    }
    PathBuf::from(raw)
}

fn create_folder(path: &Path) {
    if let Err(e) = std::fs::create_dir_all(path) {
        warn!("Failed to create {:?}: {}", path, e);
    }
}
