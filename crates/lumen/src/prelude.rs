//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use lumen::prelude::*;
//! ```

pub use crate::{
    init_logging, App, AppBuilder, ChatSession, LumenConfig,
    Conversation, Message, MessagePatch, Sender, Theme, ViewMode, DEFAULT_VARIANT,
    CustomSettingsPatch, BackgroundPatch,
    Preferences, PreferencesBuilder, StoreObserver,
    ChatStore, ThemeStore,
    ApiClient, ApiError, Upload,
};
