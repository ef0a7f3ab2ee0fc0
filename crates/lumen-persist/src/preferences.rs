use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lumen_types::{CustomSettings, Theme, ViewMode};
use serde::{de::DeserializeOwned, Serialize};

use crate::builder::PreferencesBuilder;
use crate::error::{PersistError, Result};
use crate::keys::Keys;
use crate::trait_client::KeyValueStore;

/// Typed view over a [`KeyValueStore`].
///
/// Each preference is an independent key; a missing key means "use the
/// default". Reads of malformed values surface as errors so callers can decide
/// whether to fall back.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    keys: Keys,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(store, Keys::default())
    }

    pub fn with_keys(store: Arc<dyn KeyValueStore>, keys: Keys) -> Self {
        Self { store, keys }
    }

    pub fn builder() -> PreferencesBuilder {
        PreferencesBuilder::new()
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    // Theme

    /// Persisted theme, `None` when absent or not a recognized variant
    pub fn theme(&self) -> Result<Option<Theme>> {
        let key = self.keys.theme();
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };
        match raw.parse::<Theme>() {
            Ok(theme) => Ok(Some(theme)),
            Err(e) => {
                tracing::debug!(key = %key, "Ignoring stored theme: {}", e);
                Ok(None)
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(&self.keys.theme(), theme.as_str())
    }

    pub fn custom_settings(&self) -> Result<Option<CustomSettings>> {
        self.get_json(&self.keys.theme_settings())
    }

    pub fn set_custom_settings(&self, settings: &CustomSettings) -> Result<()> {
        self.set_json(&self.keys.theme_settings(), settings)
    }

    // Drafts

    pub fn draft(&self, conversation_id: &str) -> Result<Option<String>> {
        self.store.get(&self.keys.draft(conversation_id))
    }

    /// Store a draft. An empty draft removes the entry.
    pub fn set_draft(&self, conversation_id: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.remove_draft(conversation_id);
        }
        self.store.set(&self.keys.draft(conversation_id), text)
    }

    pub fn remove_draft(&self, conversation_id: &str) -> Result<()> {
        self.store.remove(&self.keys.draft(conversation_id))
    }

    /// Conversation ids that currently have a stored draft
    pub fn conversations_with_drafts(&self) -> Result<Vec<String>> {
        let prefix = self.keys.draft_prefix();
        let mut ids: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }

    // Favorites

    pub fn favorites(&self) -> Result<Vec<String>> {
        Ok(self.get_json(&self.keys.favorites())?.unwrap_or_default())
    }

    pub fn is_favorite(&self, id: &str) -> Result<bool> {
        Ok(self.favorites()?.iter().any(|f| f == id))
    }

    /// Flip membership of `id`. Returns whether it is a favorite afterwards.
    ///
    /// A malformed stored list is replaced rather than propagated.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let mut favorites = match self.favorites() {
            Ok(list) => list,
            Err(PersistError::Serialization(e)) => {
                tracing::warn!("Discarding malformed favorites list: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let now_favorite = if let Some(pos) = favorites.iter().position(|f| f == id) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(id.to_string());
            true
        };

        self.set_json(&self.keys.favorites(), &favorites)?;
        Ok(now_favorite)
    }

    // Last used

    pub fn last_used(&self) -> Result<BTreeMap<String, DateTime<Utc>>> {
        Ok(self.get_json(&self.keys.last_used())?.unwrap_or_default())
    }

    pub fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let mut map = match self.last_used() {
            Ok(map) => map,
            Err(PersistError::Serialization(e)) => {
                tracing::warn!("Discarding malformed last-used map: {}", e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(id.to_string(), at);
        self.set_json(&self.keys.last_used(), &map)
    }

    /// Most recently used ids first, at most `limit` entries
    pub fn recently_used(&self, limit: usize) -> Result<Vec<(String, DateTime<Utc>)>> {
        let mut entries: Vec<_> = self.last_used()?.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        Ok(entries)
    }

    // View mode

    pub fn view_mode(&self) -> Result<ViewMode> {
        let key = self.keys.view_mode();
        match self.store.get(&key)? {
            Some(raw) => raw.parse().map_err(|e: lumen_types::ParseVariantError| {
                PersistError::InvalidValue {
                    key,
                    reason: e.to_string(),
                }
            }),
            None => Ok(ViewMode::default()),
        }
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> Result<()> {
        self.store.set(&self.keys.view_mode(), mode.as_str())
    }
}
