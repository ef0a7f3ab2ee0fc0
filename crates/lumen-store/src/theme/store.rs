use std::sync::Arc;

use lumen_persist::Preferences;
use lumen_types::{BackgroundPatch, CustomSettingsPatch, Theme};
use tokio::sync::watch;

use super::state::{ThemeEffect, ThemeState};
use crate::observer::{StoreObserver, TracingObserver};

/// Theme state machine with persistence and a presentation channel.
///
/// The theme the rendering layer should show is published on a
/// [`watch`] channel; subscribers always see the latest applied theme.
pub struct ThemeStore {
    state: ThemeState,
    preferences: Preferences,
    observer: Arc<dyn StoreObserver>,
    presentation: watch::Sender<Theme>,
}

impl ThemeStore {
    pub fn new(preferences: Preferences) -> Self {
        let state = ThemeState::new();
        let (presentation, _) = watch::channel(state.presented_theme());
        Self {
            state,
            preferences,
            observer: Arc::new(TracingObserver),
            presentation,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    pub fn current_theme(&self) -> Theme {
        self.state.current_theme()
    }

    /// Receive every theme applied to the rendering layer
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.presentation.subscribe()
    }

    /// Last theme handed to the rendering layer
    pub fn applied_theme(&self) -> Theme {
        *self.presentation.borrow()
    }

    fn run(&self, effects: Vec<ThemeEffect>) {
        for effect in effects {
            match effect {
                ThemeEffect::Apply(theme) => {
                    tracing::debug!(theme = %theme, "Applying theme");
                    self.presentation.send_replace(theme);
                }
                ThemeEffect::PersistTheme(theme) => {
                    if let Err(e) = self.preferences.set_theme(theme) {
                        self.observer.storage_error("set_theme", &e);
                    }
                }
                ThemeEffect::PersistSettings(settings) => {
                    if let Err(e) = self.preferences.set_custom_settings(&settings) {
                        self.observer.storage_error("set_custom_settings", &e);
                    }
                }
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        let effects = self.state.set_theme(theme);
        self.run(effects);
    }

    pub fn start_preview(&mut self, theme: Theme) {
        let effects = self.state.start_preview(theme);
        self.run(effects);
    }

    pub fn stop_preview(&mut self) {
        let effects = self.state.stop_preview();
        self.run(effects);
    }

    pub fn set_custom_settings(&mut self, patch: CustomSettingsPatch) {
        let effects = self.state.set_custom_settings(patch);
        self.run(effects);
    }

    pub fn set_background_settings(&mut self, patch: BackgroundPatch) {
        let effects = self.state.set_background_settings(patch);
        self.run(effects);
    }

    /// Rehydrate from durable storage. Unreadable values are reported to the
    /// observer and the current values are kept.
    pub fn load_theme_from_storage(&mut self) {
        let theme = self.preferences.theme().unwrap_or_else(|e| {
            self.observer.storage_error("load_theme", &e);
            None
        });
        let settings = self.preferences.custom_settings().unwrap_or_else(|e| {
            self.observer.storage_error("load_theme_settings", &e);
            None
        });

        let effects = self.state.hydrate(theme, settings);
        self.run(effects);
    }
}
