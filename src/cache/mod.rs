//! Cache Module
//!
//! TTL key-value caching over two interchangeable backends: an in-memory
//! expiring map with a background sweep, and an adapter over a remote REST
//! key-value store with native expiration.

mod entry;
mod facade;
mod local;
mod namespaced;
mod remote;


// Re-export public types
pub use entry::CacheEntry;
pub use facade::Cache;
pub use local::{LocalMapBackend, LocalStore};
pub use namespaced::NamespacedRemoteCache;
pub use remote::RemoteStoreBackend;
