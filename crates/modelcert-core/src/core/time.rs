// modelcert-core/src/core/time.rs
// ============================================================================
// Module: Modelcert Time
// Description: Explicit timestamp type for deterministic workflow evaluation.
// Purpose: Keep wall-clock reads out of the core; callers supply time.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The core never reads the system clock. Every operation that depends on
//! time takes an explicit [`Timestamp`] so that replays and tests are fully
//! deterministic. Hosts are expected to pass a monotone sequence of
//! timestamps; the core only compares and adds fixed offsets.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Milliseconds in one day.
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Unix-epoch timestamp in milliseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix-epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix-epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns this timestamp shifted forward by whole days.
    ///
    /// Saturates on overflow; retention windows of a century stay well inside
    /// the representable range.
    #[must_use]
    pub const fn plus_days(self, days: i64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(MILLIS_PER_DAY)))
    }

    /// Returns this timestamp shifted forward by milliseconds.
    #[must_use]
    pub const fn plus_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
