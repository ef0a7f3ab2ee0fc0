pub mod builder;
pub mod dbs;
pub mod error;
pub mod keys;
pub mod preferences;
pub mod trait_client;

pub use builder::PreferencesBuilder;
pub use dbs::{JsonFileStore, MemoryStore};
pub use error::{PersistError, Result};
pub use keys::Keys;
pub use preferences::Preferences;
pub use trait_client::KeyValueStore;
