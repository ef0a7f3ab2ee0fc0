use lumen_types::{
    BackgroundPatch, BackgroundSettings, CustomSettings, CustomSettingsPatch, Theme,
};

/// Whether a preview overlay is active. Holding the preview theme inside the
/// variant keeps it from outliving preview mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Normal,
    Previewing(Theme),
}

/// Side effects requested by a theme transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEffect {
    /// Present this theme to the rendering layer
    Apply(Theme),
    PersistTheme(Theme),
    PersistSettings(CustomSettings),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeState {
    current_theme: Theme,
    custom_settings: CustomSettings,
    background_settings: BackgroundSettings,
    mode: ThemeMode,
}

impl ThemeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    pub fn custom_settings(&self) -> &CustomSettings {
        &self.custom_settings
    }

    pub fn background_settings(&self) -> &BackgroundSettings {
        &self.background_settings
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn preview_mode(&self) -> bool {
        matches!(self.mode, ThemeMode::Previewing(_))
    }

    pub fn preview_theme(&self) -> Option<Theme> {
        match self.mode {
            ThemeMode::Previewing(theme) => Some(theme),
            ThemeMode::Normal => None,
        }
    }

    /// The theme the rendering layer should currently show
    pub fn presented_theme(&self) -> Theme {
        self.preview_theme().unwrap_or(self.current_theme)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Vec<ThemeEffect> {
        self.current_theme = theme;
        self.mode = ThemeMode::Normal;
        vec![ThemeEffect::PersistTheme(theme), ThemeEffect::Apply(theme)]
    }

    pub fn start_preview(&mut self, theme: Theme) -> Vec<ThemeEffect> {
        self.mode = ThemeMode::Previewing(theme);
        vec![ThemeEffect::Apply(theme)]
    }

    pub fn stop_preview(&mut self) -> Vec<ThemeEffect> {
        self.mode = ThemeMode::Normal;
        vec![ThemeEffect::Apply(self.current_theme)]
    }

    pub fn set_custom_settings(&mut self, patch: CustomSettingsPatch) -> Vec<ThemeEffect> {
        self.custom_settings.merge(patch);
        vec![ThemeEffect::PersistSettings(self.custom_settings.clone())]
    }

    pub fn set_background_settings(&mut self, patch: BackgroundPatch) -> Vec<ThemeEffect> {
        self.background_settings.merge(patch);
        Vec::new()
    }

    /// Adopt values read back from storage.
    ///
    /// `settings` is expected to be already merged over defaults. A loaded
    /// theme is only presented when no preview is showing.
    pub fn hydrate(
        &mut self,
        theme: Option<Theme>,
        settings: Option<CustomSettings>,
    ) -> Vec<ThemeEffect> {
        let mut effects = Vec::new();
        if let Some(theme) = theme {
            self.current_theme = theme;
            if !self.preview_mode() {
                effects.push(ThemeEffect::Apply(theme));
            }
        }
        if let Some(settings) = settings {
            self.custom_settings = settings;
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_types::{BackgroundKind, FontSize};

    #[test]
    fn test_initial_state() {
        let state = ThemeState::new();
        assert_eq!(state.current_theme(), Theme::Sanctuary);
        assert!(!state.preview_mode());
        assert_eq!(state.preview_theme(), None);
    }

    #[test]
    fn test_preview_rollback_for_every_theme() {
        for start in Theme::ALL {
            for preview in Theme::ALL {
                let mut state = ThemeState::new();
                state.set_theme(start);
                state.start_preview(preview);
                assert_eq!(state.presented_theme(), preview);
                assert_eq!(state.current_theme(), start);

                let effects = state.stop_preview();
                assert_eq!(effects, vec![ThemeEffect::Apply(start)]);
                assert_eq!(state.current_theme(), start);
                assert_eq!(state.preview_theme(), None);
            }
        }
    }

    #[test]
    fn test_set_theme_ends_preview() {
        let mut state = ThemeState::new();
        state.start_preview(Theme::Ember);
        let effects = state.set_theme(Theme::Aurora);
        assert_eq!(
            effects,
            vec![
                ThemeEffect::PersistTheme(Theme::Aurora),
                ThemeEffect::Apply(Theme::Aurora)
            ]
        );
        assert_eq!(state.mode(), ThemeMode::Normal);
    }

    #[test]
    fn test_preview_is_not_persisted() {
        let mut state = ThemeState::new();
        let effects = state.start_preview(Theme::Midnight);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, ThemeEffect::PersistTheme(_))));
    }

    #[test]
    fn test_settings_merge_and_persist() {
        let mut state = ThemeState::new();
        state.set_custom_settings(CustomSettingsPatch::new().high_contrast(true));
        let effects = state.set_custom_settings(CustomSettingsPatch::new().font_size(FontSize::Small));

        let expected = CustomSettings {
            high_contrast: true,
            font_size: FontSize::Small,
            ..Default::default()
        };
        assert_eq!(state.custom_settings(), &expected);
        assert_eq!(effects, vec![ThemeEffect::PersistSettings(expected)]);
    }

    #[test]
    fn test_background_is_memory_only() {
        let mut state = ThemeState::new();
        let effects = state.set_background_settings(BackgroundPatch::kind(BackgroundKind::Animated));
        assert!(effects.is_empty());
        assert_eq!(state.background_settings().kind, BackgroundKind::Animated);
    }

    #[test]
    fn test_hydrate_during_preview_does_not_present() {
        let mut state = ThemeState::new();
        state.start_preview(Theme::Ember);
        let effects = state.hydrate(Some(Theme::Verdant), None);
        assert!(effects.is_empty());
        assert_eq!(state.current_theme(), Theme::Verdant);
        assert_eq!(state.presented_theme(), Theme::Ember);
    }
}
