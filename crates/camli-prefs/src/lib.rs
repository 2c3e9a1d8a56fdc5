// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camlistore uploader — preference store port, backends, and the typed
// accessor layered over them.

pub mod backend;
pub mod keys;
pub mod preferences;
pub mod profiles;
pub mod store;
pub mod value;

pub use backend::{JsonFileBackend, MemoryBackend, SharedPreferences, SqliteBackend};
pub use preferences::{Preferences, filename, open_active, store_name_for_profile};
pub use profiles::{Profiles, open_profiles};
pub use store::{Edit, Editor, PreferenceStore, StoreProvider, WriteMode};
pub use value::PrefValue;
