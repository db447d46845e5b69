//! ttlstore - A TTL key-value cache with two interchangeable backends
//!
//! Provides one uniform cache surface over an in-memory expiring map (with a
//! background sweep) and a remote REST key-value store with native per-key
//! expiration. Route handlers and other callers stay backend-agnostic.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, LocalMapBackend, NamespacedRemoteCache, RemoteStoreBackend};
pub use config::{CacheConfig, NamespacedConfig, RemoteCredentials};
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
