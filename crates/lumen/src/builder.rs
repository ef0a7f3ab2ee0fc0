use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_api::{ApiClient, HttpTransport, QueryCache, Transport};
use lumen_persist::{Preferences, PreferencesBuilder};
use lumen_store::{ChatState, ChatStore, StoreObserver, ThemeStore, TracingObserver};

use crate::config::LumenConfig;
use crate::session::ChatSession;

/// Everything a Lumen client needs, wired from one [`LumenConfig`]
pub struct App {
    config: LumenConfig,
    preferences: Preferences,
    chat: ChatStore,
    theme: ThemeStore,
    api: ApiClient,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn config(&self) -> &LumenConfig {
        &self.config
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn chat(&self) -> &ChatStore {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatStore {
        &mut self.chat
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Conversation flow over the chat store and the backend
    pub fn session(&mut self) -> ChatSession<'_> {
        ChatSession::new(&mut self.chat, &self.api)
    }
}

/// Builder for [`App`]
///
/// Anything not set explicitly is derived from the config: preferences from
/// `storage.path`, the backend client from `api`.
#[derive(Default)]
pub struct AppBuilder {
    config: Option<LumenConfig>,
    preferences: Option<Preferences>,
    transport: Option<Arc<dyn Transport>>,
    observer: Option<Arc<dyn StoreObserver>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LumenConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Talk to the backend through `transport` instead of HTTP
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> Result<App> {
        let config = self.config.unwrap_or_default();

        let preferences = match self.preferences {
            Some(preferences) => preferences,
            None => {
                let builder = PreferencesBuilder::new();
                let builder = match &config.storage.path {
                    Some(path) => builder.json_file(path.clone()),
                    None => builder.memory(),
                };
                builder.build().context("Failed to open preference storage")?
            }
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransport::new(config.api.base_url.clone(), config.api.timeout())
                    .context("Failed to create backend client")?,
            ),
        };
        let api = ApiClient::with_cache(transport, Arc::new(QueryCache::new(config.api.cache_ttl())));

        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver) as Arc<dyn StoreObserver>);

        let chat = ChatStore::with_state(
            ChatState::with_variant(config.chat.default_variant.clone()),
            preferences.clone(),
        )
        .with_observer(observer.clone());

        let mut theme = ThemeStore::new(preferences.clone()).with_observer(observer);
        theme.load_theme_from_storage();

        tracing::info!(
            base_url = %config.api.base_url,
            theme = %theme.current_theme(),
            "Lumen client ready"
        );

        Ok(App {
            config,
            preferences,
            chat,
            theme,
            api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_types::Theme;

    #[test]
    fn test_build_with_defaults() {
        let app = AppBuilder::new().build().unwrap();
        assert_eq!(app.chat().current_variant(), lumen_types::DEFAULT_VARIANT);
        assert_eq!(app.theme().current_theme(), Theme::Sanctuary);
        assert_eq!(app.api().cache().keep_unused_for().as_secs(), 60);
    }

    #[test]
    fn test_build_restores_theme_from_preferences() {
        let preferences = PreferencesBuilder::new().memory().build().unwrap();
        preferences.set_theme(Theme::Midnight).unwrap();

        let app = App::builder().preferences(preferences).build().unwrap();
        assert_eq!(app.theme().current_theme(), Theme::Midnight);
        assert_eq!(app.theme().applied_theme(), Theme::Midnight);
    }

    #[test]
    fn test_build_rejects_bad_base_url() {
        let mut config = LumenConfig::default();
        config.api.base_url = "localhost".to_string();
        assert!(App::builder().config(config).build().is_err());
    }
}
