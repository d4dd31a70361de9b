// modelcert-core/src/runtime/retry.rs
// ============================================================================
// Module: Modelcert Retry Policy
// Description: Bounded exponential backoff policy for suite execution.
// Purpose: Represent retry behavior as an explicit value, not per call site.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Suite executions are retried under an explicit [`RetryPolicy`] value
//! (initial delay, multiplier, cap, attempt limit) injected into the engine.
//! Sleeping is behind the [`Sleeper`] seam so tests never wait on real time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Retry Policy
// ============================================================================

/// Bounded exponential backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_millis: u64,
    /// Backoff multiplier applied per subsequent retry.
    pub multiplier: u32,
    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_millis: u64,
    /// Maximum attempts including the first.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_millis: 5_000,
            multiplier: 2,
            max_delay_millis: 300_000,
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Returns the backoff delay after a given failed attempt (1-based),
    /// in milliseconds.
    #[must_use]
    pub fn delay_after_attempt(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1);
        let factor = u64::from(self.multiplier).saturating_pow(exponent);
        self.initial_delay_millis.saturating_mul(factor).min(self.max_delay_millis)
    }
}

// ============================================================================
// SECTION: Sleeper Seam
// ============================================================================

/// Sleep abstraction so retry delays are injectable.
pub trait Sleeper {
    /// Sleeps for the given number of milliseconds.
    fn sleep_millis(&self, millis: u64);
}

/// Sleeper backed by the OS thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep_millis(&self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}

/// Sleeper that returns immediately, for tests and replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep_millis(&self, _millis: u64) {}
}
