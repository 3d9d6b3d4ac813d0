use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Synchronous string storage holding whole serialized blobs per key.
pub trait KeyValueStore: Send + Sync {
    /// Whether this context has real storage behind it.
    fn is_available(&self) -> bool {
        true
    }
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Asynchronous record storage grouped in named collections, keyed by string.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }
    /// Every record of the collection in the backend's enumeration order.
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Value>>;
    async fn get(&self, collection: &str, key: &str) -> StorageResult<Option<Value>>;
    /// Inserts or replaces the record stored under `key`.
    async fn put(&self, collection: &str, key: &str, record: Value) -> StorageResult<()>;
    async fn delete(&self, collection: &str, key: &str) -> StorageResult<()>;
}

/// Key-value storage for contexts without persistence: reads are empty and
/// writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullKeyValue;

impl KeyValueStore for NullKeyValue {
    fn is_available(&self) -> bool {
        false
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        debug!(key, "null storage read");
        Ok(None)
    }

    fn set_item(&self, key: &str, _value: &str) -> StorageResult<()> {
        debug!(key, "null storage write dropped");
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObjectStore;

#[async_trait]
impl ObjectStore for NullObjectStore {
    fn is_available(&self) -> bool {
        false
    }

    async fn get_all(&self, _collection: &str) -> StorageResult<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn get(&self, _collection: &str, _key: &str) -> StorageResult<Option<Value>> {
        Ok(None)
    }

    async fn put(&self, collection: &str, key: &str, _record: Value) -> StorageResult<()> {
        debug!(collection, key, "null object store write dropped");
        Err(StorageError::Unavailable)
    }

    async fn delete(&self, _collection: &str, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_key_value_reads_nothing() {
        let store = NullKeyValue;
        store.set_item("theme", "dark").unwrap();
        assert_eq!(store.get_item("theme").unwrap(), None);
        assert!(!store.is_available());
    }

    #[tokio::test]
    async fn null_object_store_is_empty() {
        let store = NullObjectStore;
        assert!(store.get_all("presets").await.unwrap().is_empty());
        assert!(store.get("presets", "Standard").await.unwrap().is_none());
        assert!(store.put("presets", "Standard", Value::Null).await.is_err());
    }
}
