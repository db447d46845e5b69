//! Cache Entry Module
//!
//! Defines the value-plus-expiry record the local backend keeps per key.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single local cache entry. Owned exclusively by the backend's map and
/// never handed out to callers.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, already JSON-normalized by the facade
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl_ms` milliseconds from now.
    pub fn new(value: Value, ttl_ms: u64) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms() + ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is logically present iff
    /// `now < expires_at`, so it counts as expired the instant the TTL has
    /// fully elapsed.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Remaining TTL ==
    /// Returns remaining time until expiry in milliseconds (0 when expired).
    pub fn remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
