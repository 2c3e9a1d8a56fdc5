// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop/CI bridge: preference stores as JSON files in the user data
// directory.

use std::path::{Path, PathBuf};

use camli_core::error::Result;
use camli_prefs::{JsonFileBackend, PreferenceStore, StoreProvider};

use crate::traits::PlatformBridge;

/// Application directory name under the data root.
const APP_DIR: &str = "camli-uploader";

/// Sub-directory holding one file per store, named like the platform's.
const PREFS_DIR: &str = "shared_prefs";

/// Directory the desktop bridge keeps stores in.
///
/// `$XDG_DATA_HOME`, else `$HOME/.local/share`, else `/tmp`, followed by
/// `camli-uploader/shared_prefs`. Nothing is created until the first write.
pub fn default_prefs_dir() -> PathBuf {
    data_root().join(APP_DIR).join(PREFS_DIR)
}

fn data_root() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    PathBuf::from("/tmp")
}

/// File-backed bridge used on every non-mobile target.
pub struct DesktopBridge {
    backend: JsonFileBackend,
}

impl DesktopBridge {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: JsonFileBackend::new(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        self.backend.dir()
    }
}

impl StoreProvider for DesktopBridge {
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>> {
        self.backend.open_store(name)
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }

    fn storage_location(&self) -> String {
        self.backend.dir().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camli_prefs::{keys, open_active, open_profiles};

    #[test]
    fn default_dir_ends_with_app_layout() {
        let dir = default_prefs_dir();
        assert!(dir.ends_with("camli-uploader/shared_prefs"));
    }

    #[test]
    fn profiles_and_settings_land_in_separate_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let bridge = DesktopBridge::new(tmp.path());

        open_profiles(&bridge)
            .expect("open profiles")
            .select("work")
            .expect("select");

        let mut prefs = open_active(&bridge).expect("open active");
        prefs
            .store_mut()
            .edit()
            .put_bool(keys::AUTO, true)
            .commit()
            .expect("commit");

        assert!(tmp.path().join("CamliUploader_profiles.json").exists());
        assert!(tmp.path().join("CamliUploader.work.json").exists());
        assert!(!tmp.path().join("CamliUploader.json").exists());
        assert_eq!(bridge.platform_name(), "Desktop");
        assert_eq!(bridge.storage_location(), tmp.path().display().to_string());
    }
}
