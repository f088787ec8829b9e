//! Error types for avdloc
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for location resolution
#[derive(Error, Debug)]
pub enum LocationError {
    #[error("No valid home folder found (ANDROID_SDK_HOME: {detail})")]
    HomeNotFound { detail: String },

    #[error(
        "ANDROID_SDK_HOME is set to the root of your SDK: {}\n\
         This is the path of the preference folder expected by the Android tools.\n\
         It should NOT be set to the same as the root of your SDK.\n\
         Please set it to a different folder or do not set it at all.\n\
         If this is not set we default to: {}",
        .path.display(),
        default_display(.default)
    )]
    InvalidOverride {
        path: PathBuf,
        default: Option<PathBuf>,
    },

    #[error(
        "Unable to create folder '{}'. \
         This is the path of preference folder expected by the Android tools.",
        .path.display()
    )]
    DirectoryCreationDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{} is not a directory!\n\
         This is the path of preference folder expected by the Android tools.",
        .path.display()
    )]
    NotADirectory { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn default_display(default: &Option<PathBuf>) -> String {
    match default {
        Some(path) => path.display().to_string(),
        None => "<none>".to_string(),
    }
}

/// Result type alias for location operations
pub type Result<T> = std::result::Result<T, LocationError>;

impl LocationError {
    /// Whether fixing the environment and calling again can succeed
    pub fn is_environment_issue(&self) -> bool {
        matches!(
            self,
            LocationError::HomeNotFound { .. } | LocationError::InvalidOverride { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LocationError::HomeNotFound { .. } => format!(
                "{}. Set ANDROID_SDK_HOME or HOME to an existing directory.",
                self
            ),
            LocationError::DirectoryCreationDenied { path, source } => {
                format!("Permission problem creating {}: {}", path.display(), source)
            }
            LocationError::Io(e) => format!("File operation failed: {}", e),
            LocationError::Config(msg) => format!("Configuration error: {}", msg),
            _ => self.to_string(),
        }
    }
}
