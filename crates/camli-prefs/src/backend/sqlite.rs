// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SQLite-backed preference stores.
//
// Every store lives in one table keyed by (store, key). Values are kept as
// their JSON encoding so booleans, strings, and string sets share a column.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use camli_core::error::{CamliError, Result};
use rusqlite::{Connection, params};
use tracing::{debug, info, instrument};

use super::{PreferenceBackend, SharedPreferences};
use crate::store::{PreferenceStore, StoreProvider};
use crate::value::PrefValue;

/// SQLite schema for the preferences table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS prefs (
        store TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (store, key)
    )
"#;

/// Preference stores in a single SQLite database.
///
/// Clones share the connection, so several stores from the same database
/// can be open at once.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| CamliError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| CamliError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| CamliError::Database(format!("create table: {e}")))?;

        info!("preferences database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CamliError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| CamliError::Database(format!("create table: {e}")))?;

        debug!("in-memory preferences database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open store `name` on this backend.
    pub fn prefs(&self, name: &str) -> Result<SharedPreferences<Self>> {
        SharedPreferences::open(self.clone(), name)
    }

    /// Names of every store that holds at least one value.
    pub fn store_names(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT store FROM prefs ORDER BY store")
            .map_err(|e| CamliError::Database(format!("prepare: {e}")))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CamliError::Database(format!("query stores: {e}")))?;
        let names = rows
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CamliError::Database(format!("read store name: {e}")))?;
        Ok(names)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CamliError::Database("connection lock poisoned".into()))
    }
}

impl PreferenceBackend for SqliteBackend {
    #[instrument(skip(self))]
    fn load(&self, name: &str) -> Result<BTreeMap<String, PrefValue>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key, value FROM prefs WHERE store = ?1")
            .map_err(|e| CamliError::Database(format!("prepare: {e}")))?;
        let rows = stmt
            .query_map(params![name], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| CamliError::Database(format!("query prefs: {e}")))?;

        let mut values = BTreeMap::new();
        for row in rows {
            let (key, json) = row.map_err(|e| CamliError::Database(format!("read row: {e}")))?;
            let value: PrefValue = serde_json::from_str(&json)?;
            values.insert(key, value);
        }
        debug!(entries = values.len(), "store loaded");
        Ok(values)
    }

    #[instrument(skip(self, values), fields(entries = values.len()))]
    fn save(&self, name: &str, values: &BTreeMap<String, PrefValue>) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CamliError::Database(format!("begin: {e}")))?;

        tx.execute("DELETE FROM prefs WHERE store = ?1", params![name])
            .map_err(|e| CamliError::Database(format!("delete store: {e}")))?;

        for (key, value) in values {
            let json = serde_json::to_string(value)?;
            tx.execute(
                "INSERT INTO prefs (store, key, value) VALUES (?1, ?2, ?3)",
                params![name, key, json],
            )
            .map_err(|e| CamliError::Database(format!("insert {key}: {e}")))?;
        }

        tx.commit()
            .map_err(|e| CamliError::Database(format!("commit: {e}")))?;
        Ok(())
    }
}

impl StoreProvider for SqliteBackend {
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>> {
        Ok(Box::new(self.prefs(name)?))
    }
}
