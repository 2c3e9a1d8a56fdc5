// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Camlistore uploader — native platform preference bridges.
//!
//! Picks the settings mechanism of the target OS at compile time: Android
//! `SharedPreferences` through JNI, or JSON files under the user data
//! directory everywhere else. Callers only see a [`traits::PlatformBridge`],
//! which opens stores by name like the platform's application context does.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod desktop;

use camli_core::error::Result;

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Result<Box<dyn traits::PlatformBridge>> {
    #[cfg(target_os = "android")]
    {
        Ok(Box::new(android::AndroidBridge::new()))
    }
    #[cfg(not(target_os = "android"))]
    {
        Ok(Box::new(desktop::DesktopBridge::new(
            desktop::default_prefs_dir(),
        )))
    }
}
