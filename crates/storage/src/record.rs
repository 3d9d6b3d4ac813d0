//! Whole-record persistence of settings structs in key-value storage.
//!
//! Records are stored as one JSON object per key. Decoding is lenient: every
//! field that is missing, `null`, or of the wrong shape keeps its default while
//! the remaining fields are taken from storage.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::backend::KeyValueStore;
use crate::error::StorageResult;

/// Overlays the fields of `stored` onto `T::default()`, skipping any field
/// that would make the record fail to deserialize.
pub fn decode_with_defaults<T>(stored: &str) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    let defaults = T::default();
    let stored = match serde_json::from_str::<Value>(stored) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("stored record is not a JSON object; using defaults");
            return defaults;
        }
        Err(err) => {
            warn!(%err, "stored record is not valid JSON; using defaults");
            return defaults;
        }
    };
    let mut merged: Map<String, Value> = match serde_json::to_value(&defaults) {
        Ok(Value::Object(map)) => map,
        _ => return defaults,
    };

    for (field, value) in stored {
        let Some(previous) = merged.get(&field).cloned() else {
            debug!(field = %field, "ignoring unknown stored field");
            continue;
        };
        merged.insert(field.clone(), value);
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            debug!(field = %field, "stored field has the wrong shape; keeping default");
            merged.insert(field, previous);
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}

/// Reads the record under `key`, falling back to defaults when storage is
/// unavailable, empty, or unreadable.
pub fn load_record<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    if !store.is_available() {
        return T::default();
    }
    match store.get_item(key) {
        Ok(Some(text)) => decode_with_defaults(&text),
        Ok(None) => T::default(),
        Err(err) => {
            warn!(key, %err, "failed to read stored record; using defaults");
            T::default()
        }
    }
}

/// Writes the whole record under `key`. A no-op when storage is unavailable.
pub fn save_record<T>(store: &dyn KeyValueStore, key: &str, record: &T) -> StorageResult<()>
where
    T: Serialize,
{
    if !store.is_available() {
        return Ok(());
    }
    let text = serde_json::to_string(record)?;
    store.set_item(key, &text)?;
    debug!(key, bytes = text.len(), "persisted record");
    Ok(())
}
