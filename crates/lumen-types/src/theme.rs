use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
}

/// The closed set of visual themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Sanctuary,
    Aurora,
    Midnight,
    Ember,
    Verdant,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Sanctuary,
        Theme::Aurora,
        Theme::Midnight,
        Theme::Ember,
        Theme::Verdant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sanctuary => "sanctuary",
            Theme::Aurora => "aurora",
            Theme::Midnight => "midnight",
            Theme::Ember => "ember",
            Theme::Verdant => "verdant",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ParseVariantError {
                kind: "theme",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindSupport {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

/// Accessibility settings. Missing fields deserialize to their defaults, so a
/// partially stored record merges over the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomSettings {
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub font_size: FontSize,
    pub color_blind_support: ColorBlindSupport,
}

impl CustomSettings {
    pub fn merge(&mut self, patch: CustomSettingsPatch) {
        if let Some(v) = patch.high_contrast {
            self.high_contrast = v;
        }
        if let Some(v) = patch.reduced_motion {
            self.reduced_motion = v;
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.color_blind_support {
            self.color_blind_support = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomSettingsPatch {
    pub high_contrast: Option<bool>,
    pub reduced_motion: Option<bool>,
    pub font_size: Option<FontSize>,
    pub color_blind_support: Option<ColorBlindSupport>,
}

impl CustomSettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_contrast(mut self, on: bool) -> Self {
        self.high_contrast = Some(on);
        self
    }

    pub fn reduced_motion(mut self, on: bool) -> Self {
        self.reduced_motion = Some(on);
        self
    }

    pub fn font_size(mut self, size: FontSize) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn color_blind_support(mut self, mode: ColorBlindSupport) -> Self {
        self.color_blind_support = Some(mode);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Gradient,
    Pattern,
    Animated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundSettings {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_background: Option<String>,
}

impl BackgroundSettings {
    pub fn merge(&mut self, patch: BackgroundPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(custom) = patch.custom_background {
            self.custom_background = custom;
        }
    }
}

/// `custom_background: Some(None)` clears the custom background.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundPatch {
    pub kind: Option<BackgroundKind>,
    pub custom_background: Option<Option<String>>,
}

impl BackgroundPatch {
    pub fn kind(kind: BackgroundKind) -> Self {
        Self {
            kind: Some(kind),
            custom_background: None,
        }
    }

    pub fn custom_background(mut self, value: Option<String>) -> Self {
        self.custom_background = Some(value);
        self
    }
}

/// Catalog layout toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl FromStr for ViewMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(ParseVariantError {
                kind: "view mode",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_round_trips_through_str() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let settings: CustomSettings =
            serde_json::from_str(r#"{"highContrast": true, "fontSize": "extra-large"}"#).unwrap();
        assert!(settings.high_contrast);
        assert!(!settings.reduced_motion);
        assert_eq!(settings.font_size, FontSize::ExtraLarge);
        assert_eq!(settings.color_blind_support, ColorBlindSupport::None);
    }

    #[test]
    fn test_background_patch_clears_custom_background() {
        let mut bg = BackgroundSettings {
            kind: BackgroundKind::Pattern,
            custom_background: Some("stars.png".into()),
        };
        bg.merge(BackgroundPatch::default().custom_background(None));
        assert_eq!(bg.kind, BackgroundKind::Pattern);
        assert_eq!(bg.custom_background, None);
    }

    #[test]
    fn test_background_uses_type_key() {
        let json = serde_json::to_value(BackgroundSettings::default()).unwrap();
        assert_eq!(json["type"], "gradient");
    }
}
