use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::trait_client::KeyValueStore;

/// In-process store, optionally bounded by a byte quota (keys + values)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total size past `limit` bytes
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(limit),
        }
    }

    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(lock_err)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> PersistError {
    PersistError::Lock(e.to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(lock_err)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(lock_err)?;

        if let Some(limit) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(PersistError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(lock_err)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(lock_err)?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_basic() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get("b").unwrap(), None);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.set("a", "1").unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(PersistError::Lock(_))));
        assert!(matches!(store.is_empty(), Err(PersistError::Lock(_))));
        assert!(matches!(store.get("a"), Err(PersistError::Lock(_))));
    }

    #[test]
    fn test_memory_quota() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap();

        // Overwriting the same key only counts the new value
        store.set("k", "123456789").unwrap();

        let err = store.set("other", "xxxxxx").unwrap_err();
        assert!(matches!(err, PersistError::QuotaExceeded { limit: 10, .. }));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
