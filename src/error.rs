//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Callers are expected to
//! treat any failed cache operation as a miss and degrade gracefully; this
//! layer only surfaces failures, it does not retry them.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A value could not be JSON-encoded for storage
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level failure talking to the remote store
    #[error("remote request failed: {0}")]
    Remote(#[from] reqwest::Error),

    /// The remote store answered with an error reply
    #[error("remote protocol error: {0}")]
    Protocol(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
