//! SDK installation handle
//!
//! The resolver only needs to know where an installation lives on disk.

use std::path::{Path, PathBuf};

/// Access to an SDK installation's root folder
pub trait SdkHandler {
    fn location(&self) -> &Path;
}

/// A plain SDK root path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLocation {
    path: PathBuf,
}

impl SdkLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SdkHandler for SdkLocation {
    fn location(&self) -> &Path {
        &self.path
    }
}

impl SdkHandler for Path {
    fn location(&self) -> &Path {
        self
    }
}

impl SdkHandler for PathBuf {
    fn location(&self) -> &Path {
        self.as_path()
    }
}

/// Check if a folder looks like an SDK root that has no `.android` preference folder
pub fn is_sdk_root_without_dot_android(folder: &Path) -> bool {
    // An SDK root carries both platforms and platform-tools
    folder.join("platforms").is_dir()
        && folder.join("platform-tools").is_dir()
        && !folder.join(crate::FOLDER_DOT_ANDROID).is_dir()
}

/// Make a path absolute against the current directory without resolving links
///
/// Repeated and trailing separators are dropped, so `/opt/sdk/` and
/// `/opt/sdk` name the same installation.
pub fn absolute_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    joined.components().collect()
}
