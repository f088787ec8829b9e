//! Candidate sources for the preference and AVD folders
//!
//! Each source is read as a process property, an environment variable, or
//! both (property first). Sources are always checked in a fixed order.

use std::path::{Path, PathBuf};

use avdloc_core::{LocationError, Result};
use tracing::{debug, warn};

use crate::env::Environment;
use crate::sdk::is_sdk_root_without_dot_android;

/// A named origin for a folder path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    AndroidAvdHome,
    AndroidSdkHome,
    /// Bazel test sandbox
    TestTmpdir,
    UserHome,
    Home,
}

/// Whether an SDK-root override is an error or just skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    #[default]
    Silent,
    Strict,
}

/// Outcome of checking one raw path value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathCheck {
    /// Existing directory, usable as-is
    Valid(PathBuf),
    /// Not an existing directory
    Rejected,
    /// ANDROID_SDK_HOME pointing at an SDK installation root
    SdkRoot(PathBuf),
}

impl CandidateSource {
    /// Sources for the preference folder, in priority order
    pub const HOME_FOLDER: [CandidateSource; 4] = [
        CandidateSource::AndroidSdkHome,
        CandidateSource::TestTmpdir,
        CandidateSource::UserHome,
        CandidateSource::Home,
    ];

    /// Sources for the user's home, in priority order
    pub const USER_HOME: [CandidateSource; 3] = [
        CandidateSource::TestTmpdir,
        CandidateSource::UserHome,
        CandidateSource::Home,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CandidateSource::AndroidAvdHome => "ANDROID_AVD_HOME",
            CandidateSource::AndroidSdkHome => "ANDROID_SDK_HOME",
            CandidateSource::TestTmpdir => "TEST_TMPDIR",
            CandidateSource::UserHome => avdloc_core::USER_HOME_PROPERTY,
            CandidateSource::Home => "HOME",
        }
    }

    pub fn is_property(self) -> bool {
        matches!(
            self,
            CandidateSource::AndroidAvdHome
                | CandidateSource::AndroidSdkHome
                | CandidateSource::UserHome
        )
    }

    pub fn is_env_var(self) -> bool {
        !matches!(self, CandidateSource::UserHome)
    }

    /// Raw values for this source, property before environment variable
    pub fn raw_values(self, env: &Environment) -> Vec<PathBuf> {
        let mut values = Vec::with_capacity(2);
        if self.is_property() {
            if let Some(value) = env.property(self.name()) {
                values.push(PathBuf::from(value));
            }
        }
        if self.is_env_var() {
            if let Some(value) = env.var(self.name()) {
                values.push(PathBuf::from(value));
            }
        }
        values
    }

    /// Check one raw value against this source's rules
    pub fn check(self, path: &Path) -> PathCheck {
        if !path.is_dir() {
            return PathCheck::Rejected;
        }
        if self == CandidateSource::AndroidSdkHome && is_sdk_root_without_dot_android(path) {
            return PathCheck::SdkRoot(path.to_path_buf());
        }
        PathCheck::Valid(path.to_path_buf())
    }
}

/// Return the first value among `sources` that names a valid directory
///
/// In strict mode an SDK-root override fails with `InvalidOverride`; in
/// silent mode it is skipped like any other unusable value.
pub fn find_valid_path(
    sources: &[CandidateSource],
    env: &Environment,
    mode: CheckMode,
) -> Result<Option<PathBuf>> {
    for &source in sources {
        for raw in source.raw_values(env) {
            match source.check(&raw) {
                PathCheck::Valid(path) => {
                    debug!("Using {} = {:?}", source.name(), path);
                    return Ok(Some(path));
                }
                PathCheck::Rejected => {
                    debug!("Skipping {} = {:?}: not a directory", source.name(), raw);
                }
                PathCheck::SdkRoot(path) => {
                    if mode == CheckMode::Strict {
                        let default =
                            find_valid_path(&CandidateSource::USER_HOME, env, CheckMode::Silent)?;
                        return Err(LocationError::InvalidOverride { path, default });
                    }
                    warn!("Ignoring {} = {:?}: it is an SDK root", source.name(), path);
                }
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sdk_root(dir: &Path) {
        std::fs::create_dir_all(dir.join("platforms")).unwrap();
        std::fs::create_dir_all(dir.join("platform-tools")).unwrap();
    }

    #[test]
    fn test_source_flags() {
        assert!(CandidateSource::AndroidSdkHome.is_property());
        assert!(CandidateSource::AndroidSdkHome.is_env_var());
        assert!(!CandidateSource::TestTmpdir.is_property());
        assert!(CandidateSource::UserHome.is_property());
        assert!(!CandidateSource::UserHome.is_env_var());
        assert!(!CandidateSource::Home.is_property());
        assert_eq!(CandidateSource::UserHome.name(), "user.home");
    }

    #[test]
    fn test_property_before_env() {
        let prop = TempDir::new().unwrap();
        let var = TempDir::new().unwrap();
        let env = Environment::new()
            .with_property("ANDROID_SDK_HOME", prop.path().to_string_lossy())
            .with_var("ANDROID_SDK_HOME", var.path());

        let found = find_valid_path(&[CandidateSource::AndroidSdkHome], &env, CheckMode::Silent)
            .unwrap();
        assert_eq!(found, Some(prop.path().to_path_buf()));
    }

    #[test]
    fn test_flags_restrict_lookup() {
        let dir = TempDir::new().unwrap();
        // user.home is never read from the environment, HOME never from properties
        let env = Environment::new()
            .with_var("user.home", dir.path())
            .with_property("HOME", dir.path().to_string_lossy());

        let found = find_valid_path(
            &[CandidateSource::UserHome, CandidateSource::Home],
            &env,
            CheckMode::Silent,
        )
        .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_skips_missing_and_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();

        let env = Environment::new()
            .with_var("ANDROID_SDK_HOME", dir.path().join("missing"))
            .with_var("TEST_TMPDIR", &file)
            .with_var("HOME", dir.path());

        let found = find_valid_path(&CandidateSource::HOME_FOLDER, &env, CheckMode::Silent).unwrap();
        assert_eq!(found, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_sdk_root_strict_and_silent() {
        let sdk = TempDir::new().unwrap();
        sdk_root(sdk.path());
        let home = TempDir::new().unwrap();

        let env = Environment::new()
            .with_var("ANDROID_SDK_HOME", sdk.path())
            .with_var("HOME", home.path());

        assert_eq!(
            CandidateSource::AndroidSdkHome.check(sdk.path()),
            PathCheck::SdkRoot(sdk.path().to_path_buf())
        );

        let silent = find_valid_path(&CandidateSource::HOME_FOLDER, &env, CheckMode::Silent).unwrap();
        assert_eq!(silent, Some(home.path().to_path_buf()));

        match find_valid_path(&CandidateSource::HOME_FOLDER, &env, CheckMode::Strict) {
            Err(LocationError::InvalidOverride { path, default }) => {
                assert_eq!(path, sdk.path());
                assert_eq!(default, Some(home.path().to_path_buf()));
            }
            other => panic!("expected InvalidOverride, got {:?}", other),
        }
    }

    #[test]
    fn test_sdk_root_only_matters_for_sdk_home() {
        let sdk = TempDir::new().unwrap();
        sdk_root(sdk.path());

        assert_eq!(
            CandidateSource::Home.check(sdk.path()),
            PathCheck::Valid(sdk.path().to_path_buf())
        );
    }

    #[test]
    fn test_sdk_root_with_dot_android_is_valid() {
        let sdk = TempDir::new().unwrap();
        sdk_root(sdk.path());
        std::fs::create_dir(sdk.path().join(".android")).unwrap();

        assert_eq!(
            CandidateSource::AndroidSdkHome.check(sdk.path()),
            PathCheck::Valid(sdk.path().to_path_buf())
        );
    }
}
