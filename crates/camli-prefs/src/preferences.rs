// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed accessor over the uploader's preference store.
//
// Every getter reads straight from the wrapped store and falls back to the
// per-key default, so a fresh store yields a fully usable configuration. A
// non-empty dev IP switches the accessor into dev mode, where the server
// endpoint and credentials are replaced by the local development values.

use camli_core::error::{CamliError, Result};
use camli_core::{HostPort, UploaderConfig};
use tracing::{debug, instrument};

use crate::keys::{self, LIST_SEPARATOR};
use crate::store::{PreferenceStore, StoreProvider};

/// Uploader settings backed by one opened preference store.
pub struct Preferences<S> {
    store: S,
}

impl<S> Preferences<S> {
    /// Wrap an already-opened store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn auto_requires_power(&self) -> bool {
        self.store.get_bool(keys::AUTO_REQUIRE_POWER, false)
    }

    pub fn auto_requires_wifi(&self) -> bool {
        self.store.get_bool(keys::AUTO_REQUIRE_WIFI, false)
    }

    pub fn auto_required_wifi_ssid(&self) -> String {
        self.store.get_string(keys::AUTO_REQUIRED_WIFI_SSID, "")
    }

    pub fn auto_upload(&self) -> bool {
        self.store.get_bool(keys::AUTO, false)
    }

    /// Cache size in megabytes.
    ///
    /// Stored as a decimal string. A value that does not parse is an error,
    /// never silently replaced by the default.
    pub fn max_cache_mb(&self) -> Result<i32> {
        let raw = self.store.get_string(keys::MAX_CACHE_MB, "256");
        match raw.parse::<i32>() {
            Ok(mb) => Ok(mb),
            Err(source) => Err(CamliError::InvalidNumber {
                key: keys::MAX_CACHE_MB.to_string(),
                value: raw,
                source,
            }),
        }
    }

    /// Cache size in bytes (`max_cache_mb * 1024 * 1024`).
    pub fn max_cache_bytes(&self) -> Result<i64> {
        Ok(i64::from(self.max_cache_mb()?) * 1024 * 1024)
    }

    pub fn auto_dir_photos(&self) -> bool {
        self.store.get_bool(keys::AUTO_DIR_PHOTOS, true)
    }

    pub fn auto_dir_mytracks(&self) -> bool {
        self.store.get_bool(keys::AUTO_DIR_MYTRACKS, true)
    }

    fn dev_ip(&self) -> String {
        self.store.get_string(keys::DEV_IP, "")
    }

    fn in_dev_mode(&self) -> bool {
        !self.dev_ip().is_empty()
    }

    pub fn username(&self) -> String {
        if self.in_dev_mode() {
            return keys::DEV_USERNAME.to_string();
        }
        self.store.get_string(keys::USERNAME, "")
    }

    pub fn password(&self) -> String {
        if self.in_dev_mode() {
            return keys::DEV_PASSWORD.to_string();
        }
        self.store.get_string(keys::PASSWORD, "")
    }

    /// Server endpoint. In dev mode this is `http://<dev ip>:3179`.
    pub fn host_port(&self) -> HostPort {
        let dev_ip = self.dev_ip();
        if !dev_ip.is_empty() {
            return HostPort::new(&format!("http://{dev_ip}:{}", keys::DEV_PORT));
        }
        HostPort::new(&self.store.get_string(keys::HOST, ""))
    }

    /// Set (or, with `""`, clear) the developer server IP.
    pub fn set_dev_ip(&mut self, value: &str) {
        self.store.edit().put_string(keys::DEV_IP, value).apply();
    }

    /// Like [`set_dev_ip`](Self::set_dev_ip), but reports whether the value
    /// reached storage.
    pub fn commit_dev_ip(&mut self, value: &str) -> Result<()> {
        self.store.edit().put_string(keys::DEV_IP, value).commit()
    }

    /// Replace the backup directory list.
    ///
    /// Entries are joined with newlines, so an entry that itself contains a
    /// newline comes back as several entries.
    pub fn set_auto_backup_dirs(&mut self, dirs: &[String]) {
        self.store
            .edit()
            .put_string(keys::AUTO_BACKUP_DIRS, dirs.join(LIST_SEPARATOR))
            .apply();
    }

    /// Like [`set_auto_backup_dirs`](Self::set_auto_backup_dirs), but reports
    /// whether the list reached storage.
    pub fn commit_auto_backup_dirs(&mut self, dirs: &[String]) -> Result<()> {
        self.store
            .edit()
            .put_string(keys::AUTO_BACKUP_DIRS, dirs.join(LIST_SEPARATOR))
            .commit()
    }

    /// Backup directories in the order they were stored.
    pub fn auto_backup_dirs(&self) -> Vec<String> {
        let joined = self.store.get_string(keys::AUTO_BACKUP_DIRS, "");
        if joined.is_empty() {
            return Vec::new();
        }
        joined.split(LIST_SEPARATOR).map(str::to_string).collect()
    }

    /// Resolve every setting into one snapshot.
    pub fn config(&self) -> Result<UploaderConfig> {
        Ok(UploaderConfig {
            host_port: self.host_port(),
            username: self.username(),
            password: self.password(),
            dev_mode: self.in_dev_mode(),
            auto_upload: self.auto_upload(),
            auto_requires_power: self.auto_requires_power(),
            auto_requires_wifi: self.auto_requires_wifi(),
            auto_required_wifi_ssid: self.auto_required_wifi_ssid(),
            auto_dir_photos: self.auto_dir_photos(),
            auto_dir_mytracks: self.auto_dir_mytracks(),
            backup_dirs: self.auto_backup_dirs(),
            max_cache_mb: self.max_cache_mb()?,
            max_cache_bytes: self.max_cache_bytes()?,
        })
    }
}

/// Store name for `profile`: the bare [`keys::NAME`] for the default
/// profile (kept for compatibility with installs that predate profiles),
/// otherwise `NAME.<profile>`.
pub fn store_name_for_profile(profile: &str) -> String {
    if profile == keys::DEFAULT_PROFILE {
        return keys::NAME.to_string();
    }
    format!("{}.{profile}", keys::NAME)
}

/// Name of the preference store for the currently selected profile.
///
/// Reads the profiles store through `provider`; a profiles store that was
/// never written selects the default profile.
#[instrument(skip_all)]
pub fn filename<P: StoreProvider + ?Sized>(provider: &P) -> Result<String> {
    let profiles = provider.open_store(keys::PROFILES_FILE)?;
    let current = profiles.get_string(keys::PROFILE, keys::DEFAULT_PROFILE);
    let name = store_name_for_profile(&current);
    debug!(profile = %current, store = %name, "resolved preference store");
    Ok(name)
}

/// Open the preference store of the currently selected profile.
pub fn open_active<P: StoreProvider + ?Sized>(
    provider: &P,
) -> Result<Preferences<Box<dyn PreferenceStore>>> {
    let name = filename(provider)?;
    Ok(Preferences::new(provider.open_store(&name)?))
}
