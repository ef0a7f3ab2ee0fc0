//! Client-side state for Lumen.
//!
//! Each store is split in two layers: a pure state type ([`ChatState`],
//! [`ThemeState`]) whose transitions never touch I/O, and a thin store
//! ([`ChatStore`], [`ThemeStore`]) that runs the persistence side effects
//! against [`lumen_persist::Preferences`] and reports diagnostics to a
//! [`StoreObserver`].

pub mod chat;
pub mod observer;
pub mod theme;

pub use chat::{filter_conversations, ChatState, ChatStore, Outcome};
pub use observer::{NoopObserver, StoreObserver, Target, TracingObserver};
pub use theme::{ThemeEffect, ThemeMode, ThemeState, ThemeStore};
