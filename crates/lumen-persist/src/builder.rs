use std::path::PathBuf;
use std::sync::Arc;

use crate::dbs::{JsonFileStore, MemoryStore};
use crate::error::{PersistError, Result};
use crate::keys::{Keys, DEFAULT_PREFIX};
use crate::preferences::Preferences;
use crate::trait_client::KeyValueStore;

enum Backend {
    Memory { quota_bytes: Option<usize> },
    JsonFile(PathBuf),
    Custom(Arc<dyn KeyValueStore>),
}

pub struct PreferencesBuilder {
    backend: Option<Backend>,
    key_prefix: String,
}

impl PreferencesBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            key_prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn memory(mut self) -> Self {
        self.backend = Some(Backend::Memory { quota_bytes: None });
        self
    }

    pub fn memory_with_quota(mut self, quota_bytes: usize) -> Self {
        self.backend = Some(Backend::Memory {
            quota_bytes: Some(quota_bytes),
        });
        self
    }

    pub fn json_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.backend = Some(Backend::JsonFile(path.into()));
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.backend = Some(Backend::Custom(store));
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn build(self) -> Result<Preferences> {
        if self.key_prefix.trim().is_empty() {
            return Err(PersistError::Internal("key_prefix must not be empty".to_string()));
        }

        let backend = self
            .backend
            .ok_or_else(|| PersistError::Internal("a storage backend is required".to_string()))?;

        let store: Arc<dyn KeyValueStore> = match backend {
            Backend::Memory { quota_bytes: None } => Arc::new(MemoryStore::new()),
            Backend::Memory {
                quota_bytes: Some(limit),
            } => Arc::new(MemoryStore::with_quota(limit)),
            Backend::JsonFile(path) => Arc::new(JsonFileStore::open(path)?),
            Backend::Custom(store) => store,
        };

        Ok(Preferences::with_keys(store, Keys::new(self.key_prefix)))
    }
}

impl Default for PreferencesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
