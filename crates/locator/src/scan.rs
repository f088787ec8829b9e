//! AVD ownership scan
//!
//! Decides whether the devices in an AVD folder were created by a given SDK
//! installation by looking for SDK-relative paths in their descriptors.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use avdloc_core::Properties;
use tracing::{debug, error, warn};

/// Descriptor files read inside each device folder
pub const DESCRIPTOR_FILES: [&str; 3] = ["config.ini", "hardware-qemu.ini", "hardware.ini"];

/// Descriptor keys whose values point into the SDK
pub const OWNERSHIP_KEYS: [&str; 4] = [
    "skin.path",
    "kernel.path",
    "disk.ramdisk.path",
    "disk.systemPartition.initPath",
];

/// Result of scanning an AVD folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// This device folder references the installation
    Owned(PathBuf),
    /// Device folders exist, none reference the installation
    Foreign,
    /// No device folders at all
    Empty,
}

/// True when `value` lies inside `installation`
pub fn is_within_installation(value: &str, installation: &Path) -> bool {
    let installation: PathBuf = installation.components().collect();
    let prefix = format!("{}{}", installation.to_string_lossy(), MAIN_SEPARATOR);
    value.starts_with(&prefix)
}

/// Parse a descriptor file, `None` when it can't be read
pub fn read_descriptor(path: &Path) -> Option<Properties> {
    match Properties::load(path) {
        Ok(properties) => Some(properties),
        Err(e) => {
            error!("Failed to read descriptor {:?}: {}", path, e);
            None
        }
    }
}

/// First ownership key whose value lies inside `installation`
pub fn matching_key(properties: &Properties, installation: &Path) -> Option<&'static str> {
    OWNERSHIP_KEYS.iter().copied().find(|key| {
        properties
            .get(key)
            .map(|value| is_within_installation(value, installation))
            .unwrap_or(false)
    })
}

/// Check one device folder's descriptors
pub fn device_belongs_to(device_dir: &Path, installation: &Path) -> bool {
    for name in DESCRIPTOR_FILES {
        let path = device_dir.join(name);
        if !path.is_file() {
            continue;
        }
        let Some(properties) = read_descriptor(&path) else {
            continue;
        };
        if let Some(key) = matching_key(&properties, installation) {
            debug!("{:?} references {:?} via {}", path, installation, key);
            return true;
        }
    }
    false
}

/// Immediate sub-folders of an AVD folder, sorted by path
pub fn device_folders(avd_location: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(avd_location) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {:?}: {}", avd_location, e);
            return Vec::new();
        }
    };

    let mut folders: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();
    folders
}

/// Scan an AVD folder for a device that belongs to `installation`
pub fn scan_device_dir(avd_location: &Path, installation: &Path) -> ScanOutcome {
    let folders = device_folders(avd_location);
    if folders.is_empty() {
        return ScanOutcome::Empty;
    }

    folders
        .into_iter()
        .find(|folder| device_belongs_to(folder, installation))
        .map(ScanOutcome::Owned)
        .unwrap_or(ScanOutcome::Foreign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sdk_path(name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", MAIN_SEPARATOR, name))
    }

    fn device(avd: &Path, name: &str, file: &str, body: &str) -> PathBuf {
        let dir = avd.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), body).unwrap();
        dir
    }

    #[test]
    fn test_prefix_match() {
        let sdk = sdk_path("sdk");
        let inside = format!("{}{}skins{}pixel", sdk.display(), MAIN_SEPARATOR, MAIN_SEPARATOR);
        let sibling = format!("{}-old{}skins", sdk.display(), MAIN_SEPARATOR);

        assert!(is_within_installation(&inside, &sdk));
        assert!(!is_within_installation(&sibling, &sdk));
        assert!(!is_within_installation(&sdk.to_string_lossy(), &sdk));
        assert!(!is_within_installation("_no_skin", &sdk));

        let with_slash = PathBuf::from(format!("{}{}", sdk.display(), MAIN_SEPARATOR));
        assert!(is_within_installation(&inside, &with_slash));
    }

    #[test]
    fn test_matching_key() {
        let sdk = sdk_path("sdk");
        let mut props = Properties::new();
        props.set("hw.ramSize", "2048");
        assert_eq!(matching_key(&props, &sdk), None);

        props.set(
            "disk.systemPartition.initPath",
            format!("{}{}system.img", sdk.display(), MAIN_SEPARATOR),
        );
        assert_eq!(matching_key(&props, &sdk), Some("disk.systemPartition.initPath"));

        props.set("kernel.path", format!("{}{}kernel", sdk.display(), MAIN_SEPARATOR));
        assert_eq!(matching_key(&props, &sdk), Some("kernel.path"));
    }

    #[test]
    fn test_scan_outcomes() {
        let avd = TempDir::new().unwrap();
        let sdk_a = sdk_path("sdk-a");
        let sdk_c = sdk_path("sdk-c");

        assert_eq!(scan_device_dir(avd.path(), &sdk_a), ScanOutcome::Empty);

        // A stray file is not a device folder
        std::fs::write(avd.path().join("Pixel.ini"), "path=x").unwrap();
        assert_eq!(scan_device_dir(avd.path(), &sdk_a), ScanOutcome::Empty);

        let body = format!("skin.path={}{}skins{}foo\n", sdk_a.display(), MAIN_SEPARATOR, MAIN_SEPARATOR);
        let pixel = device(avd.path(), "Pixel.avd", "config.ini", &body);

        assert_eq!(scan_device_dir(avd.path(), &sdk_a), ScanOutcome::Owned(pixel));
        assert_eq!(scan_device_dir(avd.path(), &sdk_c), ScanOutcome::Foreign);
    }

    #[test]
    fn test_any_descriptor_counts() {
        let avd = TempDir::new().unwrap();
        let sdk = sdk_path("sdk");

        device(avd.path(), "A.avd", "config.ini", "hw.ramSize=1024\n");
        let body = format!("kernel.path={}{}kernel-qemu\n", sdk.display(), MAIN_SEPARATOR);
        let b = device(avd.path(), "B.avd", "hardware-qemu.ini", &body);

        assert_eq!(scan_device_dir(avd.path(), &sdk), ScanOutcome::Owned(b));
    }

    #[test]
    fn test_unknown_files_ignored() {
        let avd = TempDir::new().unwrap();
        let sdk = sdk_path("sdk");
        let body = format!("skin.path={}{}skins\n", sdk.display(), MAIN_SEPARATOR);
        device(avd.path(), "A.avd", "emulator-user.ini", &body);

        assert_eq!(scan_device_dir(avd.path(), &sdk), ScanOutcome::Foreign);
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            scan_device_dir(&dir.path().join("missing"), &sdk_path("sdk")),
            ScanOutcome::Empty
        );
    }
}
