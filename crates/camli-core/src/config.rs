// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolved uploader configuration.

use serde::{Deserialize, Serialize};

use crate::types::HostPort;

/// Cache size used when nothing has been stored yet.
pub const DEFAULT_MAX_CACHE_MB: i32 = 256;

/// Snapshot of every uploader setting after defaults and dev-mode overrides
/// have been applied.
///
/// Built once from the preference store and handed by reference to whatever
/// needs settings, instead of each component reading the store directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Server endpoint (synthesised from the dev IP in dev mode).
    pub host_port: HostPort,
    pub username: String,
    pub password: String,
    /// Whether a developer IP override is active.
    pub dev_mode: bool,
    /// Automatic background upload enabled.
    pub auto_upload: bool,
    /// Only auto-upload while charging.
    pub auto_requires_power: bool,
    /// Only auto-upload on Wi-Fi.
    pub auto_requires_wifi: bool,
    /// Restrict auto-upload to this SSID (empty = any network).
    pub auto_required_wifi_ssid: String,
    /// Watch the camera photo directory.
    pub auto_dir_photos: bool,
    /// Watch the MyTracks export directory.
    pub auto_dir_mytracks: bool,
    /// Extra directories to back up, in the order the user added them.
    pub backup_dirs: Vec<String>,
    pub max_cache_mb: i32,
    pub max_cache_bytes: i64,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            host_port: HostPort::new(""),
            username: String::new(),
            password: String::new(),
            dev_mode: false,
            auto_upload: false,
            auto_requires_power: false,
            auto_requires_wifi: false,
            auto_required_wifi_ssid: String::new(),
            auto_dir_photos: true,
            auto_dir_mytracks: true,
            backup_dirs: Vec::new(),
            max_cache_mb: DEFAULT_MAX_CACHE_MB,
            max_cache_bytes: i64::from(DEFAULT_MAX_CACHE_MB) * 1024 * 1024,
        }
    }
}

impl UploaderConfig {
    /// Copy of this config with the password replaced, for display and logs.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".into();
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cache_is_256_mib() {
        let config = UploaderConfig::default();
        assert_eq!(config.max_cache_mb, 256);
        assert_eq!(config.max_cache_bytes, 268_435_456);
    }

    #[test]
    fn redacted_hides_password_only_when_set() {
        let mut config = UploaderConfig::default();
        assert_eq!(config.redacted().password, "");

        config.password = "hunter2".into();
        let shown = config.redacted();
        assert_eq!(shown.password, "********");
        assert_eq!(shown.username, config.username);
    }
}
