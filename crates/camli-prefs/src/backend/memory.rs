// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process backend. Nothing survives the process; used by tests and as a
// fallback when no persistent location is available.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use camli_core::error::{CamliError, Result};

use super::{PreferenceBackend, SharedPreferences};
use crate::store::{PreferenceStore, StoreProvider};
use crate::value::PrefValue;

/// Shared in-memory map of stores. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    stores: Arc<Mutex<HashMap<String, BTreeMap<String, PrefValue>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open store `name` on this backend.
    pub fn prefs(&self, name: &str) -> Result<SharedPreferences<Self>> {
        SharedPreferences::open(self.clone(), name)
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self, name: &str) -> Result<BTreeMap<String, PrefValue>> {
        let stores = self
            .stores
            .lock()
            .map_err(|_| CamliError::Database("memory backend lock poisoned".into()))?;
        Ok(stores.get(name).cloned().unwrap_or_default())
    }

    fn save(&self, name: &str, values: &BTreeMap<String, PrefValue>) -> Result<()> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| CamliError::Database("memory backend lock poisoned".into()))?;
        stores.insert(name.to_string(), values.clone());
        Ok(())
    }
}

impl StoreProvider for MemoryBackend {
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>> {
        Ok(Box::new(self.prefs(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_are_isolated_by_name() {
        let backend = MemoryBackend::new();
        let mut a = backend.prefs("a").expect("open a");
        a.edit().put_bool("camli.auto", true).commit().expect("commit");

        let b = backend.prefs("b").expect("open b");
        assert!(!b.contains("camli.auto"));

        let a_again = backend.open_store("a").expect("reopen a");
        assert!(a_again.get_bool("camli.auto", false));
    }
}
