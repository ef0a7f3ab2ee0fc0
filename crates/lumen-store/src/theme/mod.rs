mod state;
mod store;

pub use state::{ThemeEffect, ThemeMode, ThemeState};
pub use store::ThemeStore;
