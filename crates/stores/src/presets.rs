use std::sync::{Arc, PoisonError, RwLock};

use fretboard_domain::FretboardPreset;
use fretboard_storage::{keys, ObjectStore, StorageResult};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Named fretboard presets backed by the object store.
///
/// The in-memory list is only ever replaced by a full reload from storage,
/// never patched, so after a mutation resolves it mirrors what is stored.
/// Concurrent mutations each reload; the last reload to finish is what
/// callers see.
pub struct PresetStore {
    backend: Arc<dyn ObjectStore>,
    presets: RwLock<Vec<FretboardPreset>>,
}

impl PresetStore {
    /// Creates an empty store. Call [`Self::load_presets`] or
    /// [`Self::spawn_initial_load`] to populate it.
    pub fn new(backend: Arc<dyn ObjectStore>) -> Self {
        Self {
            backend,
            presets: RwLock::new(Vec::new()),
        }
    }

    /// Starts the initial load on the current tokio runtime.
    pub fn spawn_initial_load(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.load_presets().await })
    }

    /// Snapshot of the presets in storage enumeration order.
    pub fn presets(&self) -> Vec<FretboardPreset> {
        self.presets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn load_presets(&self) {
        if !self.backend.is_available() {
            return;
        }
        match self.fetch_all().await {
            Ok(presets) => {
                debug!(count = presets.len(), "loaded presets");
                *self.presets.write().unwrap_or_else(PoisonError::into_inner) = presets;
            }
            Err(err) => warn!(%err, "failed to load presets"),
        }
    }

    async fn fetch_all(&self) -> StorageResult<Vec<FretboardPreset>> {
        let records = self.backend.get_all(keys::PRESETS).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(preset) => Some(preset),
                Err(err) => {
                    warn!(%err, "skipping unreadable preset record");
                    None
                }
            })
            .collect())
    }

    /// Stores the preset under its name, replacing any preset of that name,
    /// then reloads the list.
    pub async fn save_preset(&self, preset: &FretboardPreset) {
        if !self.backend.is_available() {
            return;
        }
        let record = match serde_json::to_value(preset) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, name = %preset.name, "failed to encode preset");
                return;
            }
        };
        match self.backend.put(keys::PRESETS, &preset.name, record).await {
            Ok(()) => info!(name = %preset.name, "saved preset"),
            Err(err) => warn!(%err, name = %preset.name, "failed to save preset"),
        }
        self.load_presets().await;
    }

    pub async fn delete_preset(&self, name: &str) {
        if !self.backend.is_available() {
            return;
        }
        match self.backend.delete(keys::PRESETS, name).await {
            Ok(()) => info!(name, "deleted preset"),
            Err(err) => warn!(%err, name, "failed to delete preset"),
        }
        self.load_presets().await;
    }

    /// Reads one preset straight from storage without touching the list.
    pub async fn get_preset(&self, name: &str) -> Option<FretboardPreset> {
        if !self.backend.is_available() {
            return None;
        }
        match self.backend.get(keys::PRESETS, name).await {
            Ok(Some(record)) => serde_json::from_value(record)
                .map_err(|err| warn!(%err, name, "unreadable preset record"))
                .ok(),
            Ok(None) => None,
            Err(err) => {
                warn!(%err, name, "failed to read preset");
                None
            }
        }
    }
}
