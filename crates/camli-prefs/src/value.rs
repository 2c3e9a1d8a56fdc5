// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Primitive values held by a preference store.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single stored preference value.
///
/// Serialized untagged, so a JSON store file reads naturally:
/// `true`, `"text"`, `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    String(String),
    StringSet(BTreeSet<String>),
}

impl PrefValue {
    /// Short type name used in log lines and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::StringSet(_) => "string-set",
        }
    }
}

impl std::fmt::Display for PrefValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::StringSet(set) => {
                let joined: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_is_untagged() {
        let set: BTreeSet<String> = ["work".to_string(), "default".to_string()].into();
        let values = vec![
            PrefValue::Bool(true),
            PrefValue::from("http://host:3179"),
            PrefValue::StringSet(set),
        ];

        let json = serde_json::to_string(&values).expect("serialize");
        assert_eq!(json, r#"[true,"http://host:3179",["default","work"]]"#);

        let back: Vec<PrefValue> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, values);
    }

    #[test]
    fn numbers_are_not_preference_values() {
        let parsed = serde_json::from_str::<PrefValue>("256");
        assert!(parsed.is_err(), "integers are stored as strings");
    }
}
