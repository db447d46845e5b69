//! Configuration Module
//!
//! Typed configuration for the cache facades. Backend choice is driven by
//! the presence of remote credentials in the config passed to the
//! constructor, never probed implicitly inside it; `from_env` constructors
//! exist as a convenience for binaries that want environment-driven setup.

use std::env;

// == Remote Credentials ==
/// Endpoint and access token for the remote REST key-value store.
///
/// Holding both fields in one struct makes a half-configured remote client
/// unrepresentable: either full credentials exist or there are none.
#[derive(Debug, Clone)]
pub struct RemoteCredentials {
    /// Base URL of the REST endpoint
    pub url: String,
    /// Bearer token sent with every request
    pub token: String,
}

impl RemoteCredentials {
    /// Reads credentials from the environment.
    ///
    /// # Environment Variables
    /// - `UPSTASH_REDIS_REST_URL` - REST endpoint base URL
    /// - `UPSTASH_REDIS_REST_TOKEN` - access token
    ///
    /// Returns `Some` only when both are present and non-empty; a partial
    /// pair deterministically resolves to `None`.
    pub fn from_env() -> Option<Self> {
        let url = env::var("UPSTASH_REDIS_REST_URL")
            .ok()
            .filter(|v| !v.is_empty())?;
        let token = env::var("UPSTASH_REDIS_REST_TOKEN")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self { url, token })
    }
}

// == Cache Config ==
/// Configuration for the general-purpose cache facade.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL in milliseconds applied when `set` is called without one
    pub default_ttl_ms: u64,
    /// Interval in milliseconds between background sweep passes (local backend)
    pub cleanup_interval_ms: u64,
    /// Remote store credentials; `None` selects the local map backend
    pub remote: Option<RemoteCredentials>,
}

impl CacheConfig {
    /// Creates a CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL_MS` - default TTL in milliseconds (default: 3600000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - sweep interval in milliseconds (default: 300000)
    /// - `UPSTASH_REDIS_REST_URL` / `UPSTASH_REDIS_REST_TOKEN` - remote credentials
    pub fn from_env() -> Self {
        Self {
            default_ttl_ms: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600_000),
            cleanup_interval_ms: env::var("CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            remote: RemoteCredentials::from_env(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: 3_600_000,
            cleanup_interval_ms: 300_000,
            remote: None,
        }
    }
}

// == Namespaced Config ==
/// Configuration for the namespaced, remote-only cache.
///
/// The namespaced cache speaks seconds natively, so its default TTL is held
/// in seconds rather than milliseconds.
#[derive(Debug, Clone)]
pub struct NamespacedConfig {
    /// Prefix prepended (with `:`) to every key
    pub namespace: String,
    /// TTL in seconds applied when `set` is called without one
    pub default_ttl_secs: u64,
    /// Remote store credentials; `None` leaves the cache permanently disabled
    pub remote: Option<RemoteCredentials>,
}

impl NamespacedConfig {
    /// Creates a config for the given namespace with no remote credentials.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            default_ttl_secs: 3_600,
            remote: None,
        }
    }

    /// Same as [`NamespacedConfig::new`] but with credentials read from the
    /// environment.
    pub fn from_env(namespace: impl Into<String>) -> Self {
        Self {
            remote: RemoteCredentials::from_env(),
            ..Self::new(namespace)
        }
    }
}
