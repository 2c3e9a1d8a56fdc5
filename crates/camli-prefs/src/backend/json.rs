// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One JSON file per store under a directory, the desktop analogue of the
// platform's `shared_prefs/<name>.xml` files.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use camli_core::error::Result;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use super::{PreferenceBackend, SharedPreferences, validate_store_name};
use crate::store::{PreferenceStore, StoreProvider};
use crate::value::PrefValue;

/// Stores preferences as `<dir>/<store name>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Use `dir` as the store directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Open store `name` on this backend.
    pub fn prefs(&self, name: &str) -> Result<SharedPreferences<Self>> {
        SharedPreferences::open(self.clone(), name)
    }

    /// Path of the file that holds store `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_store_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl PreferenceBackend for JsonFileBackend {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self, name: &str) -> Result<BTreeMap<String, PrefValue>> {
        let path = self.path_for(name)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("store file absent, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[instrument(skip(self, values), fields(dir = %self.dir.display(), entries = values.len()))]
    fn save(&self, name: &str, values: &BTreeMap<String, PrefValue>) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash never leaves a half-written store.
        // Each save gets its own temp file; concurrent writers never share one.
        let data = serde_json::to_vec_pretty(values)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(path = %path.display(), "store file written");
        Ok(())
    }
}

impl StoreProvider for JsonFileBackend {
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>> {
        Ok(Box::new(self.prefs(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camli_core::error::CamliError;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path().join("shared_prefs"));

        let mut store = backend.prefs("CamliUploader").expect("open");
        store
            .edit()
            .put_string("camli.host", "https://photos.example.com")
            .put_bool("camli.auto", true)
            .commit()
            .expect("commit");

        let reopened = JsonFileBackend::new(dir.path().join("shared_prefs"))
            .prefs("CamliUploader")
            .expect("reopen");
        assert_eq!(
            reopened.get_string("camli.host", ""),
            "https://photos.example.com"
        );
        assert!(reopened.get_bool("camli.auto", false));
        assert!(dir.path().join("shared_prefs/CamliUploader.json").exists());
    }

    #[test]
    fn saves_leave_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path());
        let mut first = backend.prefs("CamliUploader").expect("open first");
        let mut second = backend.prefs("CamliUploader").expect("open second");

        first.edit().put_bool("camli.auto", true).commit().expect("commit first");
        second
            .edit()
            .put_string("camli.username", "alice")
            .commit()
            .expect("commit second");

        let names: Vec<String> = fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["CamliUploader.json".to_string()]);

        // Last whole-map save wins.
        let reopened = backend.prefs("CamliUploader").expect("reopen");
        assert_eq!(reopened.get_string("camli.username", ""), "alice");
        assert!(!reopened.contains("camli.auto"));
    }

    #[test]
    fn missing_directory_reads_as_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path().join("never-created"));

        let store = backend.prefs("CamliUploader").expect("open");
        assert!(store.keys().is_empty());
        assert!(!backend.dir().exists(), "reading must not create files");
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("CamliUploader.json"), "{not json").expect("write");

        let result = JsonFileBackend::new(dir.path()).prefs("CamliUploader");
        assert!(matches!(result, Err(CamliError::Serialization(_))));
    }

    #[test]
    fn file_is_human_readable_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path());
        let mut store = backend.prefs("CamliUploader").expect("open");
        store.edit().put_string("camli.max_cache_mb", "512").commit().expect("commit");

        let text = fs::read_to_string(dir.path().join("CamliUploader.json")).expect("read");
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(parsed["camli.max_cache_mb"], "512");
    }

    #[test]
    fn path_for_rejects_traversal() {
        let backend = JsonFileBackend::new("/tmp/prefs");
        assert!(matches!(
            backend.path_for("../etc/passwd"),
            Err(CamliError::InvalidStoreName(_))
        ));
    }
}
