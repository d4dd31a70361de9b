// modelcert-core/src/core/config.rs
// ============================================================================
// Module: Modelcert Feature Configuration
// Description: Instance-scoped feature flags with explicit overrides.
// Purpose: Replace process-global flag state with injected configuration.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Feature flags are carried by an injected [`FeatureFlags`] value rather
//! than process-global state, so overrides are scoped to the constructing
//! component and never leak between runs or tests. Overrides shadow defaults
//! until explicitly cleared.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Feature Flags
// ============================================================================

/// Instance-scoped feature flag set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Baseline flag values.
    defaults: BTreeMap<String, bool>,
    /// Overrides shadowing the baseline until cleared.
    overrides: BTreeMap<String, bool>,
}

impl FeatureFlags {
    /// Creates an empty flag set; unknown flags read as disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the baseline value for a flag.
    pub fn set_default(&mut self, name: impl Into<String>, enabled: bool) {
        self.defaults.insert(name.into(), enabled);
    }

    /// Overrides a flag, shadowing its baseline value.
    pub fn set_override(&mut self, name: impl Into<String>, enabled: bool) {
        self.overrides.insert(name.into(), enabled);
    }

    /// Clears one override, restoring the baseline value.
    pub fn clear_override(&mut self, name: &str) {
        self.overrides.remove(name);
    }

    /// Clears all overrides.
    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    /// Returns the effective value of a flag; unknown flags are disabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.overrides
            .get(name)
            .or_else(|| self.defaults.get(name))
            .copied()
            .unwrap_or(false)
    }
}
