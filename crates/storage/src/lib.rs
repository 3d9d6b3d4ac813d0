pub mod backend;
pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod record;

pub use backend::{KeyValueStore, NullKeyValue, NullObjectStore, ObjectStore};
pub use error::{StorageError, StorageResult};
pub use file::{default_data_dir, JsonFileKeyValue, JsonFileObjectStore};
pub use memory::{MemoryKeyValue, MemoryObjectStore};
pub use record::{decode_with_defaults, load_record, save_record};
