use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::{KeyValueStore, ObjectStore};
use crate::error::{StorageError, StorageResult};

fn poisoned<T>(_: T) -> StorageError {
    StorageError::backend("storage lock poisoned")
}

/// In-process key-value storage; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    items: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut items) = store.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Makes every subsequent write fail until switched back off.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryKeyValue {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self.items.lock().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::backend("quota exceeded"));
        }
        let mut items = self.items.lock().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self.items.lock().map_err(poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// In-process object storage; each collection enumerates in key order.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::backend("transaction aborted"));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Value>> {
        let collections = self.collections.lock().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, key: &str) -> StorageResult<Option<Value>> {
        let collections = self.collections.lock().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    async fn put(&self, collection: &str, key: &str, record: Value) -> StorageResult<()> {
        self.check_writable()?;
        let mut collections = self.collections.lock().map_err(poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), record);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StorageResult<()> {
        self.check_writable()?;
        let mut collections = self.collections.lock().map_err(poisoned)?;
        if let Some(records) = collections.get_mut(collection) {
            records.remove(key);
        }
        Ok(())
    }
}
