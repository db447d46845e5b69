//! Cache Facade
//!
//! One uniform surface over the two backends. TTL units are normalized here
//! (callers speak milliseconds, the remote store speaks seconds) and values
//! are JSON-normalized here, so the backends stay simple and the public
//! contract stays backend-independent.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{LocalMapBackend, RemoteStoreBackend};
use crate::config::CacheConfig;
use crate::error::Result;

// == Backend ==
/// The concrete storage strategy, fixed at construction time.
#[derive(Debug)]
enum Backend {
    Local(LocalMapBackend),
    Remote(RemoteStoreBackend),
}

// == Cache ==
/// General-purpose TTL cache. Binds to the remote store when credentials
/// are configured, otherwise to the in-memory map with its sweep started.
#[derive(Debug)]
pub struct Cache {
    backend: Backend,
    default_ttl_ms: u64,
}

impl Cache {
    // == Constructor ==
    /// Selects a backend from the supplied configuration.
    ///
    /// Backend choice is explicit config, not ambient environment: pass
    /// `CacheConfig::from_env()` to get the environment-driven behavior.
    /// Must be called from within a Tokio runtime when no credentials are
    /// configured, since the local backend spawns its sweep task.
    pub fn new(config: CacheConfig) -> Self {
        let backend = match config.remote {
            Some(credentials) => {
                info!(url = %credentials.url, "cache bound to remote store backend");
                Backend::Remote(RemoteStoreBackend::new(&credentials))
            }
            None => {
                info!(
                    interval_ms = config.cleanup_interval_ms,
                    "cache bound to local map backend"
                );
                Backend::Local(LocalMapBackend::new(config.cleanup_interval_ms))
            }
        };

        Self {
            backend,
            default_ttl_ms: config.default_ttl_ms,
        }
    }

    /// True when the remote backend was selected.
    pub fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    // == Get ==
    /// Fetches and decodes a value. Absent, expired and corrupted entries
    /// all read as `None`; corruption is logged, never surfaced as an error.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = match &self.backend {
            Backend::Local(local) => local.get(key).await,
            Backend::Remote(remote) => remote.get(key).await?,
        };
        Ok(raw.and_then(|value| decode_value(key, value)))
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and its expiry.
    /// `ttl_ms = None` applies the configured default; the remote store
    /// receives the TTL floor-divided to whole seconds.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_ms: Option<u64>) -> Result<()> {
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        let encoded = serde_json::to_value(value)?;

        match &self.backend {
            Backend::Local(local) => {
                local.set(key, encoded, ttl_ms).await;
                Ok(())
            }
            Backend::Remote(remote) => remote.set(key, &encoded, ttl_ms / 1000).await,
        }
    }

    // == Has ==
    /// True iff the key is present and unexpired. Locally this evicts like
    /// `get`; remotely it is a pure existence check, the value is never
    /// transferred.
    pub async fn has(&self, key: &str) -> Result<bool> {
        match &self.backend {
            Backend::Local(local) => Ok(local.has(key).await),
            Backend::Remote(remote) => remote.has(key).await,
        }
    }

    // == Remaining TTL ==
    /// Remaining time until expiry in milliseconds regardless of the
    /// backend's native unit; `None` when absent or expired.
    pub async fn remaining_ttl_ms(&self, key: &str) -> Result<Option<u64>> {
        match &self.backend {
            Backend::Local(local) => Ok(local.remaining_ttl_ms(key).await),
            Backend::Remote(remote) => remote.remaining_ttl_ms(key).await,
        }
    }

    // == Get Many ==
    /// Fetches several keys; only those found and unexpired appear in the
    /// result. One MGET round trip remotely, per-key lookups locally; the
    /// observable behavior is identical.
    pub async fn get_many<T: DeserializeOwned>(
        &self,
        keys: &[&str],
    ) -> Result<HashMap<String, T>> {
        let raw = match &self.backend {
            Backend::Local(local) => local.get_many(keys).await,
            Backend::Remote(remote) => remote.get_many(keys).await?,
        };

        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| decode_value(&key, value).map(|decoded| (key, decoded)))
            .collect())
    }

    // == Set Many ==
    /// Stores several entries under one TTL. Remotely the writes are
    /// pipelined into a single round trip; the batch is not atomic and a
    /// mid-batch failure may leave a prefix applied.
    pub async fn set_many<T: Serialize>(
        &self,
        entries: &[(&str, T)],
        ttl_ms: Option<u64>,
    ) -> Result<()> {
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);

        let mut encoded = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            encoded.push(((*key).to_string(), serde_json::to_value(value)?));
        }

        match &self.backend {
            Backend::Local(local) => {
                local.set_many(encoded, ttl_ms).await;
                Ok(())
            }
            Backend::Remote(remote) => remote.set_many(&encoded, ttl_ms / 1000).await,
        }
    }

    // == Delete ==
    /// Removes one entry. True when a live entry was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        match &self.backend {
            Backend::Local(local) => Ok(local.delete(key).await),
            Backend::Remote(remote) => remote.delete(key).await,
        }
    }

    // == Clear ==
    /// Removes all entries (local map drop / remote flush).
    pub async fn clear(&self) -> Result<()> {
        match &self.backend {
            Backend::Local(local) => {
                local.clear().await;
                Ok(())
            }
            Backend::Remote(remote) => remote.clear().await,
        }
    }

    // == Destroy ==
    /// Stops the background sweep when the local backend is active.
    /// Idempotent and safe to call while operations are in flight; the
    /// remote HTTP pool is released when the facade is dropped.
    pub fn destroy(&self) {
        if let Backend::Local(local) = &self.backend {
            local.destroy();
        }
    }
}

// == Value Decoding ==
/// Shared decode policy: a cached value that no longer matches the caller's
/// type reads as a miss, not an error.
pub(crate) fn decode_value<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(key, %err, "cached value failed to decode, treating as miss");
            None
        }
    }
}
