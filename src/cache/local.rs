//! Local Map Backend
//!
//! In-memory expiring store. Expiration is enforced two ways, both required:
//! passively on every read path (expired entries are evicted in place before
//! a result is returned) and actively by a periodic background sweep that
//! evicts entries no read ever touches again.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::CacheEntry;
use crate::tasks::spawn_sweep_task;

// == Local Store ==
/// Synchronous map engine. All access goes through the backend's lock, so
/// methods mutate freely without further coordination.
#[derive(Debug, Default)]
pub struct LocalStore {
    /// Key-value storage; sole owner of its entries
    entries: HashMap<String, CacheEntry>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Set ==
    /// Stores a value expiring `ttl_ms` from now. Overwrites any existing
    /// entry for the key, including its expiry.
    pub fn set(&mut self, key: String, value: Value, ttl_ms: u64) {
        self.entries.insert(key, CacheEntry::new(value, ttl_ms));
    }

    // == Get ==
    /// Returns the value if present and unexpired. An expired entry is
    /// evicted in place and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                return None;
            }
            Some(entry.value.clone())
        } else {
            None
        }
    }

    // == Has ==
    /// True iff the key is present and unexpired; evicts like `get`.
    pub fn has(&mut self, key: &str) -> bool {
        self.remaining_ttl_ms(key).is_some()
    }

    // == Remaining TTL ==
    /// Remaining time until expiry in milliseconds, or `None` when the key
    /// is absent or expired. Evicts like `get`.
    pub fn remaining_ttl_ms(&mut self, key: &str) -> Option<u64> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                return None;
            }
            Some(entry.remaining_ms())
        } else {
            None
        }
    }

    // == Delete ==
    /// Removes an entry. Returns true only when a live entry was removed;
    /// an already-expired entry counts as absent.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Sweep Expired ==
    /// Removes every expired entry regardless of read activity.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry as-is, bypassing TTL normalization. Lets tests plant
    /// already-expired entries without waiting on the clock.
    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, key: String, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }
}

// == Local Map Backend ==
/// The local backend proper: shared store plus the sweep task it owns.
///
/// The sweep task dies with the Tokio runtime, so an un-destroyed backend
/// never keeps the process alive once all other work is done.
#[derive(Debug)]
pub struct LocalMapBackend {
    store: Arc<RwLock<LocalStore>>,
    sweeper: JoinHandle<()>,
}

impl LocalMapBackend {
    /// Creates the backend and starts its periodic sweep.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(cleanup_interval_ms: u64) -> Self {
        let store = Arc::new(RwLock::new(LocalStore::new()));
        let sweeper = spawn_sweep_task(store.clone(), cleanup_interval_ms);
        Self { store, sweeper }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: &str, value: Value, ttl_ms: u64) {
        self.store.write().await.set(key.to_string(), value, ttl_ms);
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    pub async fn remaining_ttl_ms(&self, key: &str) -> Option<u64> {
        self.store.write().await.remaining_ttl_ms(key)
    }

    /// Per-key lookups under one lock acquisition; only live keys appear in
    /// the output.
    pub async fn get_many(&self, keys: &[&str]) -> HashMap<String, Value> {
        let mut store = self.store.write().await;
        let mut out = HashMap::new();
        for key in keys {
            if let Some(value) = store.get(key) {
                out.insert((*key).to_string(), value);
            }
        }
        out
    }

    /// Applies the same TTL to every entry.
    pub async fn set_many(&self, entries: Vec<(String, Value)>, ttl_ms: u64) {
        let mut store = self.store.write().await;
        for (key, value) in entries {
            store.set(key, value, ttl_ms);
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Entry count without read-path eviction; expired entries linger here
    /// until a sweep or a read removes them.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    // == Destroy ==
    /// Stops the background sweep. Idempotent, and safe to call while
    /// operations are in flight; already-dispatched reads and writes
    /// complete on their own.
    pub fn destroy(&self) {
        self.sweeper.abort();
        debug!("local cache sweep task stopped");
    }
}

impl Drop for LocalMapBackend {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
