use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{KeyValueStore, ObjectStore};
use crate::error::{StorageError, StorageResult};

const APP_DIR: &str = "fretboard-trainer";
const KEY_VALUE_FILE: &str = "local_storage.json";

/// Sibling path a file is written to before being renamed over the original.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Per-user data directory for the trainer, when the platform has one.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

/// Key-value storage persisted as one JSON object in a file.
#[derive(Debug)]
pub struct JsonFileKeyValue {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileKeyValue {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(KEY_VALUE_FILE),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp = temp_path(&self.path);
        fs::write(&temp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), entries = map.len(), "wrote key-value file");
        Ok(())
    }

    fn modify(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> StorageResult<()> {
        let _lock = self
            .guard
            .lock()
            .map_err(|_| StorageError::backend("key-value file lock poisoned"))?;
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StorageError::Serialization(err)) => {
                warn!(path = %self.path.display(), %err, "discarding unreadable key-value file");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        apply(&mut map);
        self.write_map(&map)
    }
}

impl KeyValueStore for JsonFileKeyValue {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.modify(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.modify(|map| {
            map.remove(key);
        })
    }
}

/// Object storage keeping each collection in `<dir>/<collection>.json`.
#[derive(Debug)]
pub struct JsonFileObjectStore {
    dir: PathBuf,
    guard: tokio::sync::Mutex<()>,
}

impl JsonFileObjectStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    async fn read_collection(&self, collection: &str) -> StorageResult<BTreeMap<String, Value>> {
        match tokio::fs::read(self.collection_path(collection)).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Reads a collection for modification, starting over when the file no
    /// longer parses.
    async fn read_collection_for_write(
        &self,
        collection: &str,
    ) -> StorageResult<BTreeMap<String, Value>> {
        match self.read_collection(collection).await {
            Err(StorageError::Serialization(err)) => {
                warn!(collection, %err, "discarding unreadable collection file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn write_collection(
        &self,
        collection: &str,
        records: &BTreeMap<String, Value>,
    ) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.collection_path(collection);
        let temp = temp_path(&path);
        tokio::fs::write(&temp, serde_json::to_vec_pretty(records)?).await?;
        tokio::fs::rename(&temp, &path).await?;
        debug!(path = %path.display(), records = records.len(), "wrote collection file");
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for JsonFileObjectStore {
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Value>> {
        let _lock = self.guard.lock().await;
        Ok(self
            .read_collection(collection)
            .await?
            .into_values()
            .collect())
    }

    async fn get(&self, collection: &str, key: &str) -> StorageResult<Option<Value>> {
        let _lock = self.guard.lock().await;
        Ok(self.read_collection(collection).await?.remove(key))
    }

    async fn put(&self, collection: &str, key: &str, record: Value) -> StorageResult<()> {
        let _lock = self.guard.lock().await;
        let mut records = self.read_collection_for_write(collection).await?;
        records.insert(key.to_string(), record);
        self.write_collection(collection, &records).await
    }

    async fn delete(&self, collection: &str, key: &str) -> StorageResult<()> {
        let _lock = self.guard.lock().await;
        let mut records = self.read_collection_for_write(collection).await?;
        if records.remove(key).is_some() {
            self.write_collection(collection, &records).await?;
        }
        Ok(())
    }
}
