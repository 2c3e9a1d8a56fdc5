// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cached preference stores over pluggable persistence backends.
//
// `SharedPreferences` keeps the whole store in memory after opening it and
// writes the full map back through a `PreferenceBackend` on every change,
// mirroring how the platform store behaves on Android.

mod json;
mod memory;
mod sqlite;

use std::collections::BTreeMap;

use camli_core::error::{CamliError, Result};
use tracing::{debug, instrument};

use crate::store::{Edit, PreferenceStore, WriteMode, apply_edits};
use crate::value::PrefValue;

pub use json::JsonFileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Longest store name accepted (it becomes a file name on some backends).
const MAX_STORE_NAME_LEN: usize = 200;

/// Persistence for whole stores, addressed by store name.
pub trait PreferenceBackend {
    /// Load every value of store `name`. A store that was never written is
    /// empty, not an error.
    fn load(&self, name: &str) -> Result<BTreeMap<String, PrefValue>>;

    /// Replace the persisted contents of store `name` with `values`.
    fn save(&self, name: &str, values: &BTreeMap<String, PrefValue>) -> Result<()>;
}

/// Check that `name` is usable as a store name on every backend.
pub fn validate_store_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.len() > MAX_STORE_NAME_LEN
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if bad {
        return Err(CamliError::InvalidStoreName(name.to_string()));
    }
    Ok(())
}

/// In-memory view of one named store, persisted through backend `B`.
pub struct SharedPreferences<B> {
    name: String,
    backend: B,
    cache: BTreeMap<String, PrefValue>,
}

impl<B: PreferenceBackend> SharedPreferences<B> {
    /// Open store `name`, loading its current contents.
    #[instrument(skip(backend))]
    pub fn open(backend: B, name: &str) -> Result<Self> {
        validate_store_name(name)?;
        let cache = backend.load(name)?;
        debug!(entries = cache.len(), "preference store opened");
        Ok(Self {
            name: name.to_string(),
            backend,
            cache,
        })
    }

    /// Re-read the store from the backend, dropping the cached view.
    ///
    /// Picks up writes made through other handles on the same store.
    pub fn reload(&mut self) -> Result<()> {
        self.cache = self.backend.load(&self.name)?;
        Ok(())
    }
}

impl<B: PreferenceBackend> PreferenceStore for SharedPreferences<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<PrefValue> {
        self.cache.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.cache.keys().cloned().collect()
    }

    fn write(&mut self, edits: &[Edit], mode: WriteMode) -> Result<()> {
        if !apply_edits(&mut self.cache, edits) {
            return Ok(());
        }
        debug!(store = %self.name, edits = edits.len(), ?mode, "persisting preferences");
        self.backend.save(&self.name, &self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_name_rules() {
        assert!(validate_store_name("CamliUploader").is_ok());
        assert!(validate_store_name("CamliUploader.work").is_ok());
        assert!(validate_store_name("CamliUploader_profiles").is_ok());

        for bad in ["", ".", "..", "a/b", "a\\b", "a\nb"] {
            assert!(
                matches!(validate_store_name(bad), Err(CamliError::InvalidStoreName(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_store_name(&"x".repeat(MAX_STORE_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn writes_visible_to_other_handles_after_reload() {
        let backend = MemoryBackend::new();
        let mut writer = backend.prefs("shared").expect("open writer");
        let mut reader = backend.prefs("shared").expect("open reader");

        writer.edit().put_string("camli.dev_ip", "10.0.0.2").commit().expect("commit");
        assert!(!reader.contains("camli.dev_ip"), "reader still has its old snapshot");

        reader.reload().expect("reload");
        assert_eq!(reader.get_string("camli.dev_ip", ""), "10.0.0.2");
    }

    /// Backend whose saves always fail, to exercise apply vs commit.
    struct ReadOnlyBackend;

    impl PreferenceBackend for ReadOnlyBackend {
        fn load(&self, _name: &str) -> Result<BTreeMap<String, PrefValue>> {
            Ok(BTreeMap::new())
        }

        fn save(&self, _name: &str, _values: &BTreeMap<String, PrefValue>) -> Result<()> {
            Err(CamliError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn apply_swallows_persist_failure_but_keeps_value() {
        let mut store = SharedPreferences::open(ReadOnlyBackend, "ro").expect("open");

        store.edit().put_bool("camli.auto", true).apply();

        assert!(store.get_bool("camli.auto", false));
    }

    #[test]
    fn commit_reports_persist_failure() {
        let mut store = SharedPreferences::open(ReadOnlyBackend, "ro").expect("open");

        let result = store.edit().put_bool("camli.auto", true).commit();

        assert!(matches!(result, Err(CamliError::Io(_))));
        assert!(store.get_bool("camli.auto", false), "same-handle view still updated");
    }
}
