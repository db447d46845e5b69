//! Periodic Sweep Task
//!
//! Background task that periodically removes expired entries from a local
//! store, bounding memory growth from keys that are written once and never
//! read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LocalStore;

/// Spawns a background task that evicts expired entries every `interval_ms`.
///
/// The task sleeps between passes and takes the store's write lock only for
/// the duration of a single sweep, so it never blocks request-path
/// operations for longer than one pass. Stop it by aborting the returned
/// handle; Tokio tasks also die with the runtime, so a running sweep never
/// keeps the process alive once all other work is done.
///
/// # Arguments
/// * `store` - shared reference to the local store
/// * `interval_ms` - interval in milliseconds between sweep passes
///
/// # Returns
/// A JoinHandle used to abort the task in `destroy()`.
pub fn spawn_sweep_task(store: Arc<RwLock<LocalStore>>, interval_ms: u64) -> JoinHandle<()> {
    let interval = Duration::from_millis(interval_ms);

    tokio::spawn(async move {
        info!(interval_ms, "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = store.write().await;
                store.sweep_expired()
            };

            if removed > 0 {
                info!(removed, "sweep evicted expired entries");
            } else {
                debug!("sweep found no expired entries");
            }
        }
    })
}
