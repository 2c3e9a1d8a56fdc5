// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Profile registry kept in the profiles store.
//
// Each profile selects its own preference store (see
// `preferences::store_name_for_profile`), giving independent sets of
// settings, e.g. a home server and a work server.

use std::collections::BTreeSet;

use camli_core::error::{CamliError, Result};
use tracing::info;

use crate::keys;
use crate::preferences::store_name_for_profile;
use crate::store::{PreferenceStore, StoreProvider};

/// Longest profile name accepted.
const MAX_PROFILE_NAME_LEN: usize = 64;

/// Known profiles and the current selection.
pub struct Profiles<S> {
    store: S,
}

/// Open the profiles store through `provider`.
pub fn open_profiles<P: StoreProvider + ?Sized>(
    provider: &P,
) -> Result<Profiles<Box<dyn PreferenceStore>>> {
    Ok(Profiles::new(provider.open_store(keys::PROFILES_FILE)?))
}

/// Profile names are ASCII letters, digits, `-` and `_`.
pub fn validate_profile_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name.len() <= MAX_PROFILE_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(CamliError::InvalidProfileName(name.to_string()));
    }
    Ok(())
}

impl<S: PreferenceStore> Profiles<S> {
    /// Wrap an opened profiles store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The selected profile, `"default"` when none was ever chosen.
    pub fn current(&self) -> String {
        self.store.get_string(keys::PROFILE, keys::DEFAULT_PROFILE)
    }

    /// Every known profile. Always contains `"default"`.
    pub fn names(&self) -> BTreeSet<String> {
        let mut names = self.store.get_string_set(keys::PROFILES);
        names.insert(keys::DEFAULT_PROFILE.to_string());
        names
    }

    /// Preference store name of the selected profile.
    pub fn store_name(&self) -> String {
        store_name_for_profile(&self.current())
    }

    /// Register a profile. Returns `false` when it already existed.
    pub fn add(&mut self, name: &str) -> Result<bool> {
        validate_profile_name(name)?;
        let mut names = self.names();
        if !names.insert(name.to_string()) {
            return Ok(false);
        }
        self.store
            .edit()
            .put_string_set(keys::PROFILES, names)
            .commit()?;
        info!(profile = name, "profile added");
        Ok(true)
    }

    /// Make `name` the selected profile, registering it if needed.
    pub fn select(&mut self, name: &str) -> Result<()> {
        validate_profile_name(name)?;
        let mut names = self.names();
        names.insert(name.to_string());
        self.store
            .edit()
            .put_string_set(keys::PROFILES, names)
            .put_string(keys::PROFILE, name)
            .commit()?;
        info!(profile = name, "profile selected");
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::preferences::filename;

    #[test]
    fn fresh_registry_has_only_default() {
        let backend = MemoryBackend::new();
        let profiles = open_profiles(&backend).expect("open");

        assert_eq!(profiles.current(), "default");
        assert_eq!(profiles.names(), BTreeSet::from(["default".to_string()]));
        assert_eq!(profiles.store_name(), "CamliUploader");
    }

    #[test]
    fn add_is_idempotent() {
        let backend = MemoryBackend::new();
        let mut profiles = open_profiles(&backend).expect("open");

        assert!(profiles.add("work").expect("add"));
        assert!(!profiles.add("work").expect("add again"));
        assert!(!profiles.add("default").expect("add default"));
        assert_eq!(profiles.names().len(), 2);
        assert_eq!(profiles.current(), "default", "adding does not select");
    }

    #[test]
    fn select_switches_resolved_store() {
        let backend = MemoryBackend::new();
        let mut profiles = open_profiles(&backend).expect("open");

        profiles.select("work").expect("select");

        assert_eq!(profiles.current(), "work");
        assert!(profiles.names().contains("work"));
        assert_eq!(filename(&backend).expect("filename"), "CamliUploader.work");

        profiles.select("default").expect("select default");
        assert_eq!(filename(&backend).expect("filename"), "CamliUploader");
    }

    #[test]
    fn rejects_unsafe_names() {
        let backend = MemoryBackend::new();
        let mut profiles = open_profiles(&backend).expect("open");

        for bad in ["", "../x", "with space", "a.b", "ümlaut"] {
            assert!(
                matches!(profiles.add(bad), Err(CamliError::InvalidProfileName(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(profiles.select("a/b").is_err());
        assert_eq!(profiles.names().len(), 1);
    }
}
