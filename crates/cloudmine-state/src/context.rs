use std::sync::Arc;

use cloudmine_core::config::{AppConfig, ConfigPatch};
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::debug;

use crate::db::SlotDb;
use crate::store::Store;

/// Handle passed to every view at construction.
///
/// Cloning is cheap; all clones share one `Store`, one config channel and
/// one slot. Config changes go through `update_config` so that running
/// timers see the merged config on their watch receiver immediately.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<Mutex<Store>>,
    config_tx: Arc<watch::Sender<AppConfig>>,
    slot: Arc<SlotDb>,
}

impl AppContext {
    pub fn new(store: Store, slot: SlotDb) -> Self {
        let (config_tx, _) = watch::channel(store.config().clone());
        Self {
            store: Arc::new(Mutex::new(store)),
            config_tx: Arc::new(config_tx),
            slot: Arc::new(slot),
        }
    }

    /// Lock the store. Do not hold the guard across an `.await`.
    pub async fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().await
    }

    /// The live config as last published.
    pub fn config(&self) -> AppConfig {
        self.config_tx.borrow().clone()
    }

    pub fn subscribe_config(&self) -> watch::Receiver<AppConfig> {
        self.config_tx.subscribe()
    }

    /// Merge `patch` into the store's config and publish the result.
    pub async fn update_config(&self, patch: &ConfigPatch) -> AppConfig {
        let merged = {
            let mut store = self.store.lock().await;
            store.update_config(patch).clone()
        };
        self.config_tx.send_replace(merged.clone());
        debug!(receivers = self.config_tx.receiver_count(), "config published");
        merged
    }

    pub fn slot(&self) -> &SlotDb {
        &self.slot
    }
}
