// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preference store port.
//
// A store is a named, persistent, string-keyed map of primitive values. The
// accessor only ever talks to this trait; concrete stores live in `backend`
// (JSON files, SQLite, memory) and in the platform bridge (Android
// SharedPreferences over JNI).

use std::collections::{BTreeMap, BTreeSet};

use camli_core::error::Result;
use tracing::warn;

use crate::value::PrefValue;

/// One change inside an editor batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Put(String, PrefValue),
    Remove(String),
    /// Drop every key. Always applied before the other edits of its batch.
    Clear,
}

/// How hard a write tries to reach durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fire-and-forget: the caller never sees persistence failures.
    Apply,
    /// The caller is told whether the batch reached storage.
    Commit,
}

/// A named key/value preference store.
///
/// Writes update the in-memory view first, so the same handle observes its
/// own writes immediately even if persisting them fails afterwards.
pub trait PreferenceStore {
    /// Name the store was opened under.
    fn name(&self) -> &str;

    /// Raw lookup. `None` when the key is absent.
    fn get(&self, key: &str) -> Option<PrefValue>;

    /// Every key currently present, in no particular order.
    fn keys(&self) -> Vec<String>;

    /// Apply a batch of edits and persist the result.
    fn write(&mut self, edits: &[Edit], mode: WriteMode) -> Result<()>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Boolean value for `key`, or `default` when absent.
    ///
    /// A value of another type also yields `default` (logged at warn level).
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(PrefValue::Bool(b)) => b,
            None => default,
            Some(other) => {
                warn!(store = self.name(), key, found = other.kind(), "expected bool, using default");
                default
            }
        }
    }

    /// String value for `key`, or `default` when absent.
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(PrefValue::String(s)) => s,
            None => default.to_string(),
            Some(other) => {
                warn!(store = self.name(), key, found = other.kind(), "expected string, using default");
                default.to_string()
            }
        }
    }

    /// String-set value for `key`, empty when absent.
    fn get_string_set(&self, key: &str) -> BTreeSet<String> {
        match self.get(key) {
            Some(PrefValue::StringSet(set)) => set,
            None => BTreeSet::new(),
            Some(other) => {
                warn!(store = self.name(), key, found = other.kind(), "expected string set, using empty");
                BTreeSet::new()
            }
        }
    }

    /// Snapshot of the whole store.
    fn all(&self) -> BTreeMap<String, PrefValue> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }

    /// Start an edit batch.
    fn edit(&mut self) -> Editor<'_>
    where
        Self: Sized,
    {
        Editor::new(self)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> Option<PrefValue> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }

    fn write(&mut self, edits: &[Edit], mode: WriteMode) -> Result<()> {
        (**self).write(edits, mode)
    }
}

/// Opens preference stores by name — the application context of the
/// platform.
pub trait StoreProvider {
    /// Open (or lazily create) the store called `name`.
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>>;
}

/// Batched changes against one store, finished with [`apply`](Self::apply)
/// or [`commit`](Self::commit).
#[must_use = "edits are discarded unless applied or committed"]
pub struct Editor<'a> {
    store: &'a mut dyn PreferenceStore,
    edits: Vec<Edit>,
}

impl<'a> Editor<'a> {
    pub fn new(store: &'a mut dyn PreferenceStore) -> Self {
        Self {
            store,
            edits: Vec::new(),
        }
    }

    pub fn put_bool(mut self, key: &str, value: bool) -> Self {
        self.edits.push(Edit::Put(key.to_string(), PrefValue::Bool(value)));
        self
    }

    pub fn put_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.edits
            .push(Edit::Put(key.to_string(), PrefValue::String(value.into())));
        self
    }

    pub fn put_string_set(mut self, key: &str, value: BTreeSet<String>) -> Self {
        self.edits
            .push(Edit::Put(key.to_string(), PrefValue::StringSet(value)));
        self
    }

    pub fn put(mut self, key: &str, value: PrefValue) -> Self {
        self.edits.push(Edit::Put(key.to_string(), value));
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.edits.push(Edit::Remove(key.to_string()));
        self
    }

    pub fn clear(mut self) -> Self {
        self.edits.push(Edit::Clear);
        self
    }

    /// Write the batch, best effort.
    ///
    /// The change is visible through this store handle straight away.
    /// Persistence failures are logged and otherwise dropped.
    pub fn apply(self) {
        if self.edits.is_empty() {
            return;
        }
        if let Err(e) = self.store.write(&self.edits, WriteMode::Apply) {
            warn!(store = self.store.name(), error = %e, "preference apply failed to persist");
        }
    }

    /// Write the batch and report whether it reached storage.
    pub fn commit(self) -> Result<()> {
        if self.edits.is_empty() {
            return Ok(());
        }
        self.store.write(&self.edits, WriteMode::Commit)
    }
}

/// Apply `edits` to an in-memory map with editor semantics (clear first,
/// then puts and removes in order). Returns whether anything changed.
pub fn apply_edits(map: &mut BTreeMap<String, PrefValue>, edits: &[Edit]) -> bool {
    let mut changed = false;

    if edits.iter().any(|e| matches!(e, Edit::Clear)) && !map.is_empty() {
        map.clear();
        changed = true;
    }

    for edit in edits {
        match edit {
            Edit::Put(key, value) => {
                if map.get(key) != Some(value) {
                    map.insert(key.clone(), value.clone());
                    changed = true;
                }
            }
            Edit::Remove(key) => {
                changed |= map.remove(key).is_some();
            }
            Edit::Clear => {}
        }
    }

    changed
}
