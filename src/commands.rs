//! CLI commands for avdloc
//!
//! Each command wraps one resolver operation so it can be scripted.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use avdloc_locator::{hashed_folder_name, AndroidLocation, SdkLocation};
use tracing::{debug, info};

/// Environment variables naming the active SDK, in priority order
pub const SDK_ROOT_VARS: [&str; 2] = ["ANDROID_SDK_ROOT", "ANDROID_HOME"];

/// Print the preference folder
pub struct HomeCommand {
    pub create: bool,
}

impl HomeCommand {
    pub fn execute(&self, location: &AndroidLocation) -> Result<PathBuf> {
        if self.create {
            return Ok(location.folder()?);
        }
        location
            .folder_without_writes()
            .ok_or_else(|| anyhow!("No Android preference folder could be determined"))
    }
}

/// Print the user's home folder
pub struct UserHomeCommand;

impl UserHomeCommand {
    pub fn execute(&self, location: &AndroidLocation) -> Result<PathBuf> {
        location
            .user_home_folder()?
            .ok_or_else(|| anyhow!("No user home folder found"))
    }
}

/// Validate ANDROID_SDK_HOME
pub struct CheckSdkHomeCommand;

impl CheckSdkHomeCommand {
    pub fn execute(&self, location: &AndroidLocation) -> Result<()> {
        location.check_android_sdk_home()?;
        info!("ANDROID_SDK_HOME is usable");
        Ok(())
    }
}

/// Print the AVD folder, for a specific SDK when one is known
pub struct AvdCommand {
    pub sdk: Option<PathBuf>,
}

impl AvdCommand {
    /// Explicit SDK, else the first SDK root variable in the resolver's environment
    pub fn sdk_root(&self, location: &AndroidLocation) -> Option<PathBuf> {
        self.sdk.clone().or_else(|| {
            SDK_ROOT_VARS
                .iter()
                .find_map(|name| location.environment().var(name))
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
    }

    pub fn execute(&self, location: &AndroidLocation) -> Result<PathBuf> {
        match self.sdk_root(location) {
            Some(sdk) => {
                debug!("Resolving AVD folder for SDK {:?}", sdk);
                Ok(location.avd_folder_for(&SdkLocation::new(sdk))?)
            }
            None => {
                debug!("No SDK given, using the legacy AVD folder");
                Ok(location.avd_folder()?)
            }
        }
    }
}

/// Print the per-installation folder name for an SDK path
pub struct HashCommand {
    pub sdk: PathBuf,
}

impl HashCommand {
    pub fn execute(&self) -> String {
        hashed_folder_name(&avdloc_locator::sdk::absolute_path(&self.sdk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avdloc_locator::Environment;
    use tempfile::TempDir;

    #[test]
    fn test_home_command() {
        let home = TempDir::new().unwrap();
        let location = AndroidLocation::new(Environment::new().with_var("HOME", home.path()));

        let path = HomeCommand { create: false }.execute(&location).unwrap();
        assert!(!path.exists());

        let path = HomeCommand { create: true }.execute(&location).unwrap();
        assert_eq!(path, home.path().join(".android"));
        assert!(path.is_dir());
    }

    #[test]
    fn test_home_command_without_home() {
        let location = AndroidLocation::new(Environment::new());
        assert!(HomeCommand { create: false }.execute(&location).is_err());
        assert!(UserHomeCommand.execute(&location).is_err());
    }

    #[test]
    fn test_avd_command_sdk_fallback() {
        let home = TempDir::new().unwrap();
        let env = Environment::new()
            .with_var("HOME", home.path())
            .with_var("ANDROID_HOME", "/opt/android-home");
        let location = AndroidLocation::new(env);

        let cmd = AvdCommand { sdk: None };
        assert_eq!(cmd.sdk_root(&location), Some(PathBuf::from("/opt/android-home")));

        let cmd = AvdCommand { sdk: Some(PathBuf::from("/opt/explicit")) };
        assert_eq!(cmd.sdk_root(&location), Some(PathBuf::from("/opt/explicit")));
    }

    #[test]
    fn test_avd_command_without_sdk() {
        let home = TempDir::new().unwrap();
        let location = AndroidLocation::new(Environment::new().with_var("HOME", home.path()));

        let path = AvdCommand { sdk: None }.execute(&location).unwrap();
        assert_eq!(path, home.path().join(".android").join("avd"));
    }

    #[test]
    fn test_hash_command() {
        let name = HashCommand { sdk: PathBuf::from("/opt/sdk") }.execute();
        assert!(name.starts_with("avd_"));
        assert!(!name.contains('-'));
    }
}
