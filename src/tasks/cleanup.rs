//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries while
//! auto-cleanup is switched on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memory::MemoryStore;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The setting is checked on every tick, so toggling auto-cleanup takes
/// effect without restarting the task.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(MemoryStore::new(settings, file)));
/// let cleanup_handle = spawn_cleanup_task(store.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<RwLock<MemoryStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                if !guard.settings().auto_cleanup {
                    debug!("TTL cleanup: auto-cleanup disabled, skipping");
                    continue;
                }
                guard.clear_expired_entries()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
