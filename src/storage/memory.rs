use dashmap::DashMap;
use crate::data::error::ClientResult;
use crate::storage::KeyValueStore;

/// In-process store, nothing survives the process
pub struct MemoryStore {
    values: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: &str, value: &str) -> ClientResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
