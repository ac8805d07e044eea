pub mod memory;
pub mod sqlite;

use crate::data::error::ClientResult;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Durable string key/value storage, the local counterpart of browser storage
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Replace the whole value stored under `key`
    fn put(&self, key: &str, value: &str) -> ClientResult<()>;
}

/// Open the store named by `database_path`; `:memory:` stays in-process
pub fn open(database_path: &str) -> ClientResult<Box<dyn KeyValueStore>> {
    if database_path == ":memory:" {
        Ok(Box::new(MemoryStore::new()))
    } else {
        Ok(Box::new(SqliteStore::new(database_path)?))
    }
}

impl<T: KeyValueStore + Sync> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> ClientResult<()> {
        (**self).put(key, value)
    }
}
