// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preference keys, store names, and the table of user-editable settings.

use camli_core::error::{CamliError, Result};

use crate::value::PrefValue;

/// Baseline store name, used as-is for the default profile.
pub const NAME: &str = "CamliUploader";

/// Store holding the profile names.
pub const PROFILES_FILE: &str = "CamliUploader_profiles";
/// Set of known profile names (inside `PROFILES_FILE`).
pub const PROFILES: &str = "camli.profiles";
/// Currently selected profile (inside `PROFILES_FILE`).
pub const PROFILE: &str = "camli.profile";
/// UI element for creating a new profile.
pub const NEWPROFILE: &str = "camli.newprofile";

/// Profile that maps to the bare [`NAME`] store.
pub const DEFAULT_PROFILE: &str = "default";

pub const HOST: &str = "camli.host";
pub const USERNAME: &str = "camli.username";
pub const PASSWORD: &str = "camli.password";
pub const AUTO: &str = "camli.auto";
/// UI screen grouping the auto-upload options.
pub const AUTO_OPTS: &str = "camli.auto.opts";
pub const MAX_CACHE_MB: &str = "camli.max_cache_mb";
pub const DEV_IP: &str = "camli.dev_ip";
pub const AUTO_REQUIRE_POWER: &str = "camli.auto.require_power";
pub const AUTO_REQUIRE_WIFI: &str = "camli.auto.require_wifi";
pub const AUTO_REQUIRED_WIFI_SSID: &str = "camli.auto.required_wifi_ssid";
pub const AUTO_DIR_PHOTOS: &str = "camli.auto.photos";
pub const AUTO_DIR_MYTRACKS: &str = "camli.auto.mytracks";
pub const AUTO_BACKUP_DIRS: &str = "camli.auto.backup_dirs";
/// UI element for a single backup directory entry.
pub const AUTO_BACKUP_DIR: &str = "camli.auto.backup_dirs.dir";
/// UI element for adding a backup directory.
pub const AUTO_NEW_BACKUP_DIR: &str = "camli.auto.new_backup_dir";

/// Credentials and port substituted while a dev IP is set.
pub const DEV_USERNAME: &str = "camlistore";
pub const DEV_PASSWORD: &str = "pass3179";
pub const DEV_PORT: u16 = 3179;

/// Separator between entries of a list-valued setting.
pub const LIST_SEPARATOR: &str = "\n";

/// How a setting is represented in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Bool,
    String,
    /// Decimal integer kept as a string.
    Integer,
    /// Newline-joined list kept as a string.
    List,
}

impl KeyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Integer => "integer",
            Self::List => "list",
        }
    }
}

/// One user-editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub key: &'static str,
    pub kind: KeyKind,
    /// Default in its stored textual form.
    pub default: &'static str,
    pub summary: &'static str,
}

impl KeySpec {
    /// The default as it would be stored.
    pub fn default_value(&self) -> PrefValue {
        match self.kind {
            KeyKind::Bool => PrefValue::Bool(self.default == "true"),
            KeyKind::String | KeyKind::Integer | KeyKind::List => {
                PrefValue::String(self.default.to_string())
            }
        }
    }

    /// Convert user input into the stored value for this key.
    ///
    /// Booleans accept `true/false`, `1/0`, `yes/no`, `on/off`. Integers
    /// must fit an `i32`. Lists are edited element-wise and are rejected here.
    pub fn parse(&self, input: &str) -> Result<PrefValue> {
        match self.kind {
            KeyKind::Bool => parse_bool(input)
                .map(PrefValue::Bool)
                .ok_or_else(|| CamliError::InvalidValue {
                    key: self.key.to_string(),
                    reason: format!("{input:?} is not a boolean"),
                }),
            KeyKind::String => Ok(PrefValue::String(input.to_string())),
            KeyKind::Integer => {
                let trimmed = input.trim();
                trimmed
                    .parse::<i32>()
                    .map_err(|source| CamliError::InvalidNumber {
                        key: self.key.to_string(),
                        value: input.to_string(),
                        source,
                    })?;
                Ok(PrefValue::String(trimmed.to_string()))
            }
            KeyKind::List => Err(CamliError::InvalidValue {
                key: self.key.to_string(),
                reason: "list settings are edited one entry at a time".into(),
            }),
        }
    }
}

/// Every setting the uploader reads from the main store.
pub const SETTINGS: &[KeySpec] = &[
    KeySpec {
        key: HOST,
        kind: KeyKind::String,
        default: "",
        summary: "Server URL, e.g. https://photos.example.com:3179",
    },
    KeySpec {
        key: USERNAME,
        kind: KeyKind::String,
        default: "",
        summary: "Server username",
    },
    KeySpec {
        key: PASSWORD,
        kind: KeyKind::String,
        default: "",
        summary: "Server password",
    },
    KeySpec {
        key: AUTO,
        kind: KeyKind::Bool,
        default: "false",
        summary: "Upload new files automatically",
    },
    KeySpec {
        key: AUTO_REQUIRE_POWER,
        kind: KeyKind::Bool,
        default: "false",
        summary: "Auto-upload only while charging",
    },
    KeySpec {
        key: AUTO_REQUIRE_WIFI,
        kind: KeyKind::Bool,
        default: "false",
        summary: "Auto-upload only on Wi-Fi",
    },
    KeySpec {
        key: AUTO_REQUIRED_WIFI_SSID,
        kind: KeyKind::String,
        default: "",
        summary: "Auto-upload only on this Wi-Fi network",
    },
    KeySpec {
        key: AUTO_DIR_PHOTOS,
        kind: KeyKind::Bool,
        default: "true",
        summary: "Watch the camera photo directory",
    },
    KeySpec {
        key: AUTO_DIR_MYTRACKS,
        kind: KeyKind::Bool,
        default: "true",
        summary: "Watch the MyTracks export directory",
    },
    KeySpec {
        key: AUTO_BACKUP_DIRS,
        kind: KeyKind::List,
        default: "",
        summary: "Extra directories to back up",
    },
    KeySpec {
        key: MAX_CACHE_MB,
        kind: KeyKind::Integer,
        default: "256",
        summary: "Upload cache size in megabytes",
    },
    KeySpec {
        key: DEV_IP,
        kind: KeyKind::String,
        default: "",
        summary: "Developer server IP; overrides host and credentials",
    },
];

/// Find the setting for `key`.
pub fn lookup(key: &str) -> Result<&'static KeySpec> {
    SETTINGS
        .iter()
        .find(|spec| spec.key == key)
        .ok_or_else(|| CamliError::UnknownKey(key.to_string()))
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keys_are_unique() {
        for (i, a) in SETTINGS.iter().enumerate() {
            for b in &SETTINGS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn bool_defaults_are_well_formed() {
        for spec in SETTINGS.iter().filter(|s| s.kind == KeyKind::Bool) {
            assert!(
                spec.default == "true" || spec.default == "false",
                "{} has default {:?}",
                spec.key,
                spec.default
            );
        }
    }

    #[test]
    fn every_setting_has_a_summary() {
        assert!(SETTINGS.iter().all(|spec| !spec.summary.is_empty()));
        assert_eq!(lookup(DEV_IP).expect("known").kind.as_str(), "string");
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert_eq!(lookup(MAX_CACHE_MB).expect("known").default, "256");
        assert!(matches!(lookup("camli.nope"), Err(CamliError::UnknownKey(_))));
    }

    #[test]
    fn parse_bool_spellings() {
        let spec = lookup(AUTO).expect("known");
        assert_eq!(spec.parse("Yes").expect("yes"), PrefValue::Bool(true));
        assert_eq!(spec.parse("off").expect("off"), PrefValue::Bool(false));
        assert!(matches!(spec.parse("maybe"), Err(CamliError::InvalidValue { .. })));
    }

    #[test]
    fn parse_integer_is_stored_as_string() {
        let spec = lookup(MAX_CACHE_MB).expect("known");
        assert_eq!(spec.parse(" 512 ").expect("512"), PrefValue::from("512"));
        assert!(matches!(spec.parse("abc"), Err(CamliError::InvalidNumber { .. })));
        assert!(spec.parse("99999999999").is_err());
    }

    #[test]
    fn list_values_are_not_set_wholesale() {
        let spec = lookup(AUTO_BACKUP_DIRS).expect("known");
        assert!(spec.parse("/sdcard/DCIM").is_err());
    }
}
