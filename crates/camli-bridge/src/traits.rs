// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native preference storage.

use camli_prefs::StoreProvider;

/// Unified bridge to the platform's settings mechanism.
///
/// Opening stores comes from [`StoreProvider`]; the bridge adds what callers
/// need to report where settings live.
pub trait PlatformBridge: StoreProvider {
    /// Human-readable platform name (e.g. "Android", "Desktop").
    fn platform_name(&self) -> &str;

    /// Where the stores are kept, for diagnostics.
    fn storage_location(&self) -> String;
}
