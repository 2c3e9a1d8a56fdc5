// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Selects where preference stores live for this invocation.

use std::path::PathBuf;

use camli_bridge::traits::PlatformBridge;
use camli_core::error::Result;
use camli_prefs::{JsonFileBackend, PreferenceStore, SqliteBackend, StoreProvider};
use tracing::info;

/// The store provider chosen from the command-line flags.
pub enum Provider {
    /// `--prefs-dir`: one JSON file per store.
    Json(JsonFileBackend),
    /// `--sqlite`: every store in one database.
    Sqlite(SqliteBackend),
    /// No flag: whatever the host platform offers.
    Platform(Box<dyn PlatformBridge>),
}

impl Provider {
    /// Pick a provider. `prefs_dir` wins over `sqlite`; with neither the
    /// platform bridge is used.
    pub fn select(prefs_dir: Option<PathBuf>, sqlite: Option<PathBuf>) -> Result<Self> {
        let provider = match (prefs_dir, sqlite) {
            (Some(dir), _) => Self::Json(JsonFileBackend::new(dir)),
            (None, Some(path)) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Self::Sqlite(SqliteBackend::open(&path)?)
            }
            (None, None) => Self::Platform(camli_bridge::platform_bridge()?),
        };
        info!(location = %provider.location(), "preference provider selected");
        Ok(provider)
    }

    /// Human-readable location of the stores.
    pub fn location(&self) -> String {
        match self {
            Self::Json(backend) => backend.dir().display().to_string(),
            Self::Sqlite(_) => "SQLite database".into(),
            Self::Platform(bridge) => {
                format!("{} ({})", bridge.storage_location(), bridge.platform_name())
            }
        }
    }
}

impl StoreProvider for Provider {
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>> {
        match self {
            Self::Json(backend) => backend.open_store(name),
            Self::Sqlite(backend) => backend.open_store(name),
            Self::Platform(bridge) => bridge.open_store(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camli_prefs::open_active;

    #[test]
    fn prefs_dir_takes_precedence() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let provider = Provider::select(
            Some(tmp.path().to_path_buf()),
            Some(tmp.path().join("prefs.db")),
        )
        .expect("select");

        assert!(matches!(provider, Provider::Json(_)));
        assert_eq!(provider.location(), tmp.path().display().to_string());
        assert!(!tmp.path().join("prefs.db").exists());
    }

    #[test]
    fn sqlite_creates_parent_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let db = tmp.path().join("nested").join("prefs.db");
        let provider = Provider::select(None, Some(db.clone())).expect("select");

        assert!(matches!(provider, Provider::Sqlite(_)));
        assert!(db.exists());

        let prefs = open_active(&provider).expect("open active");
        assert_eq!(prefs.store().name(), "CamliUploader");
    }
}
