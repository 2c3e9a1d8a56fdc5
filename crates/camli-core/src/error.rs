// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the uploader preferences.

use std::num::ParseIntError;

use thiserror::Error;

/// Top-level error type for all preference operations.
#[derive(Debug, Error)]
pub enum CamliError {
    // -- Accessor errors --
    /// A key that is stored as a decimal string did not hold a valid integer.
    #[error("preference {key} holds {value:?}, which is not a valid integer")]
    InvalidNumber {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("unknown preference key: {0}")]
    UnknownKey(String),

    // -- Store / profile naming --
    #[error("invalid preference store name: {0:?}")]
    InvalidStoreName(String),

    #[error("invalid profile name: {0:?}")]
    InvalidProfileName(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CamliError>;
