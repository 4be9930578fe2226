use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, TagSearchError};

use super::PersistenceAdapter;

/// Process-local adapter. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    fn with_entries_mut<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> Result<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| TagSearchError::mutex_poisoned("memory store"))?;
        Ok(f(&mut entries))
    }

    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        self.with_entries_mut(|entries| entries.clone())
    }
}

impl PersistenceAdapter for MemoryStore {
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        self.snapshot()
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.with_entries_mut(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_entries_mut(|entries| {
            entries.remove(key);
        })
    }
}
