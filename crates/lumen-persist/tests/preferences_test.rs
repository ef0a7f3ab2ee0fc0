use chrono::{TimeZone, Utc};
use lumen_persist::{PersistError, Preferences, PreferencesBuilder};
use lumen_types::{CustomSettings, FontSize, Theme, ViewMode};

fn file_prefs(dir: &tempfile::TempDir) -> Preferences {
    PreferencesBuilder::new()
        .json_file(dir.path().join("preferences.json"))
        .build()
        .unwrap()
}

#[test]
fn test_preferences_persist_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    let prefs = file_prefs(&dir);
    prefs.set_theme(Theme::Ember).unwrap();
    prefs
        .set_custom_settings(&CustomSettings {
            font_size: FontSize::Large,
            ..Default::default()
        })
        .unwrap();
    prefs.set_draft("c1", "half a thought").unwrap();
    prefs.toggle_favorite("image-studio").unwrap();
    prefs.set_view_mode(ViewMode::List).unwrap();
    drop(prefs);

    let prefs = file_prefs(&dir);
    assert_eq!(prefs.theme().unwrap(), Some(Theme::Ember));
    assert_eq!(prefs.custom_settings().unwrap().unwrap().font_size, FontSize::Large);
    assert_eq!(prefs.draft("c1").unwrap().as_deref(), Some("half a thought"));
    assert_eq!(prefs.favorites().unwrap(), vec!["image-studio"]);
    assert_eq!(prefs.view_mode().unwrap(), ViewMode::List);
}

#[test]
fn test_last_used_is_stored_as_date_strings() {
    let prefs = PreferencesBuilder::new().memory().build().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    prefs.touch_last_used("voice-lab", at).unwrap();

    let raw = prefs.store().get("lumen.last-used").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["voice-lab"], "2024-05-01T12:00:00Z");
}

#[test]
fn test_drafts_listing() {
    let prefs = PreferencesBuilder::new().memory().build().unwrap();
    prefs.set_draft("b", "two").unwrap();
    prefs.set_draft("a", "one").unwrap();
    prefs.toggle_favorite("x").unwrap();

    assert_eq!(prefs.conversations_with_drafts().unwrap(), vec!["a", "b"]);
}

#[test]
fn test_quota_errors_surface_from_preferences() {
    let prefs = PreferencesBuilder::new().memory_with_quota(16).build().unwrap();
    let err = prefs.set_draft("c1", &"x".repeat(64)).unwrap_err();
    assert!(matches!(err, PersistError::QuotaExceeded { .. }));
}
