//! # Lumen
//!
//! Client-side core of the Lumen assistant: conversation state, theme
//! state, user preferences and the backend client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumen::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LumenConfig::load()?;
//!     init_logging(&config.logging)?;
//!
//!     let mut app = App::builder().config(config).build()?;
//!
//!     let mut session = app.session();
//!     session.sync_conversations(false).await?;
//!     let reply = session.send("Summarize yesterday's meeting").await?;
//!     println!("{}", reply.content);
//!
//!     app.theme_mut().start_preview(Theme::Aurora);
//!     app.theme_mut().stop_preview();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`lumen-types`**: conversations, messages, themes and display settings
//! - **`lumen-persist`**: key-value preference storage (memory, JSON file)
//! - **`lumen-store`**: chat aggregate store and theme state machine
//! - **`lumen-api`**: backend endpoints behind a tag-invalidated query cache
//!
//! ## License
//!
//! MIT

pub mod builder;
pub mod config;
pub mod logging;
pub mod prelude;
pub mod session;

pub use builder::{App, AppBuilder};
pub use config::{ApiConfig, ChatConfig, LoggingConfig, LumenConfig, StorageConfig};
pub use logging::init_logging;
pub use session::ChatSession;

pub use lumen_types::{
    BackgroundKind, BackgroundPatch, BackgroundSettings, ColorBlindSupport, Conversation,
    CustomSettings, CustomSettingsPatch, FontSize, Message, MessagePatch, Sender, Theme, ViewMode,
    DEFAULT_VARIANT,
};

pub use lumen_persist::{
    JsonFileStore, KeyValueStore, Keys, MemoryStore, PersistError, Preferences, PreferencesBuilder,
};

pub use lumen_store::{
    ChatState, ChatStore, NoopObserver, StoreObserver, Target, ThemeEffect, ThemeMode, ThemeState,
    ThemeStore, TracingObserver,
};

pub use lumen_api::{
    ApiClient, ApiError, CacheStats, ChatReply, HttpTransport, QueryCache, SystemStatus, Tag,
    Transport, Upload,
};
