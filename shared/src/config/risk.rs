//! Login-risk thresholds
//!
//! The compiled defaults here are the floor every runtime override is merged
//! over: a stored or configured value that is missing, `<= 0`, or a lock
//! longer than [`MAX_LOCK_SECONDS`] is ignored.

use serde::{Deserialize, Serialize};

use super::auth::positive_env;

pub const DEFAULT_PHONE_FAIL_THRESHOLD: i64 = 5;
pub const DEFAULT_IP_FAIL_THRESHOLD: i64 = 20;
pub const DEFAULT_IP_PHONE_THRESHOLD: i64 = 5;
pub const DEFAULT_LOCK_SECONDS: i64 = 900;

/// Longest lock an operator may configure (365 days)
pub const MAX_LOCK_SECONDS: i64 = 31_536_000;

/// Brute-force lockout thresholds for the three risk dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RiskConfig {
    /// Failures per phone (durable counter) before the phone is locked
    pub phone_fail_threshold: i64,

    /// Failures per source IP (ephemeral counter) before the IP is locked
    pub ip_fail_threshold: i64,

    /// Failures per IP+phone pair (ephemeral counter) before the pair is locked
    pub ip_phone_threshold: i64,

    /// Lock duration, also used as the ephemeral counter window
    pub lock_seconds: i64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            phone_fail_threshold: DEFAULT_PHONE_FAIL_THRESHOLD,
            ip_fail_threshold: DEFAULT_IP_FAIL_THRESHOLD,
            ip_phone_threshold: DEFAULT_IP_PHONE_THRESHOLD,
            lock_seconds: DEFAULT_LOCK_SECONDS,
        }
    }
}

impl RiskConfig {
    /// Create from environment variables
    ///
    /// Reads `LOGIN_FAIL_THRESHOLD`, `LOGIN_IP_FAIL_THRESHOLD`,
    /// `LOGIN_IP_PHONE_THRESHOLD` and `LOGIN_LOCK_SECONDS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            phone_fail_threshold: positive_env("LOGIN_FAIL_THRESHOLD")
                .unwrap_or(defaults.phone_fail_threshold),
            ip_fail_threshold: positive_env("LOGIN_IP_FAIL_THRESHOLD")
                .unwrap_or(defaults.ip_fail_threshold),
            ip_phone_threshold: positive_env("LOGIN_IP_PHONE_THRESHOLD")
                .unwrap_or(defaults.ip_phone_threshold),
            lock_seconds: positive_env("LOGIN_LOCK_SECONDS")
                .filter(|v| *v <= MAX_LOCK_SECONDS)
                .unwrap_or(defaults.lock_seconds),
        }
    }

    /// Merge `overrides` over `self`, keeping `self`'s value wherever the
    /// override is not strictly positive or the lock exceeds [`MAX_LOCK_SECONDS`].
    pub fn merged_with(&self, overrides: &RiskConfig) -> RiskConfig {
        fn pick(base: i64, candidate: i64) -> i64 {
            if candidate > 0 { candidate } else { base }
        }

        let lock_seconds = if overrides.lock_seconds <= MAX_LOCK_SECONDS {
            pick(self.lock_seconds, overrides.lock_seconds)
        } else {
            self.lock_seconds
        };

        RiskConfig {
            phone_fail_threshold: pick(self.phone_fail_threshold, overrides.phone_fail_threshold),
            ip_fail_threshold: pick(self.ip_fail_threshold, overrides.ip_fail_threshold),
            ip_phone_threshold: pick(self.ip_phone_threshold, overrides.ip_phone_threshold),
            lock_seconds,
        }
    }

    /// Replace any non-positive field with the compiled default
    pub fn normalized(&self) -> RiskConfig {
        RiskConfig::default().merged_with(self)
    }

    /// True when every threshold is positive and the lock duration is in range
    pub fn is_valid(&self) -> bool {
        self.phone_fail_threshold > 0
            && self.ip_fail_threshold > 0
            && self.ip_phone_threshold > 0
            && (1..=MAX_LOCK_SECONDS).contains(&self.lock_seconds)
    }
}
