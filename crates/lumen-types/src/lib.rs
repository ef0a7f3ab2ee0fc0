pub mod conversation;
pub mod theme;

pub use conversation::{Conversation, Message, MessagePatch, Sender};
pub use theme::{
    BackgroundKind, BackgroundPatch, BackgroundSettings, ColorBlindSupport, CustomSettings,
    CustomSettingsPatch, FontSize, ParseVariantError, Theme, ViewMode,
};

/// AI persona selected before the user picks one
pub const DEFAULT_VARIANT: &str = "sanctuary-guide";
