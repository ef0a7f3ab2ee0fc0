use std::fmt;

use lumen_persist::PersistError;

/// What a store operation tried to address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Conversation(String),
    Message {
        conversation_id: String,
        message_id: String,
    },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Conversation(id) => write!(f, "conversation {}", id),
            Target::Message {
                conversation_id,
                message_id,
            } => write!(f, "message {} in conversation {}", message_id, conversation_id),
        }
    }
}

/// Diagnostics hook for the stores.
///
/// Stores never surface lookup misses or storage failures to their callers;
/// they report them here instead. Observers must not assume they can change
/// the outcome of the operation.
pub trait StoreObserver: Send + Sync {
    /// An operation addressed an id that does not exist and was skipped
    fn lookup_miss(&self, _operation: &'static str, _target: &Target) {}

    /// A best-effort read or write against durable storage failed
    fn storage_error(&self, _operation: &'static str, _error: &PersistError) {}
}

/// Default observer: forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn lookup_miss(&self, operation: &'static str, target: &Target) {
        tracing::debug!(operation, %target, "Store lookup missed, ignoring");
    }

    fn storage_error(&self, operation: &'static str, error: &PersistError) {
        tracing::warn!(operation, "Preference storage failed: {}", error);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {}
