mod filter;
mod state;
mod store;

pub use filter::filter_conversations;
pub use state::{ChatState, Outcome};
pub use store::ChatStore;
