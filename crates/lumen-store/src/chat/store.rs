use std::sync::Arc;

use chrono::{DateTime, Utc};
use lumen_persist::Preferences;
use lumen_types::{Conversation, Message, MessagePatch};

use super::state::{ChatState, Outcome};
use crate::observer::{StoreObserver, TracingObserver};

/// Chat aggregate store: the single writer of conversation state.
///
/// Wraps the pure [`ChatState`] and performs the best-effort draft persistence
/// around it. Lookup misses and storage failures never reach the caller; they
/// go to the configured [`StoreObserver`].
pub struct ChatStore {
    state: ChatState,
    preferences: Preferences,
    observer: Arc<dyn StoreObserver>,
    clock: fn() -> DateTime<Utc>,
}

impl ChatStore {
    pub fn new(preferences: Preferences) -> Self {
        Self::with_state(ChatState::new(), preferences)
    }

    pub fn with_state(state: ChatState, preferences: Preferences) -> Self {
        Self {
            state,
            preferences,
            observer: Arc::new(TracingObserver),
            clock: Utc::now,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn report(&self, operation: &'static str, outcome: Outcome) {
        if let Outcome::Missing(target) = outcome {
            self.observer.lookup_miss(operation, &target);
        }
    }

    // Reads

    pub fn conversations(&self) -> &[Conversation] {
        self.state.conversations()
    }

    pub fn filtered_conversations(&self) -> Vec<&Conversation> {
        self.state.filtered_conversations()
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.state.conversation(id)
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.state.active_conversation_id()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.state.active_conversation()
    }

    pub fn current_variant(&self) -> &str {
        self.state.current_variant()
    }

    pub fn is_typing(&self) -> bool {
        self.state.is_typing()
    }

    pub fn draft(&self) -> &str {
        self.state.draft()
    }

    pub fn search_query(&self) -> &str {
        self.state.search_query()
    }

    // Mutations

    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.state.set_conversations(conversations);
    }

    pub fn set_active_conversation(&mut self, id: Option<String>) {
        self.state.set_active_conversation(id);
    }

    pub fn add_message(&mut self, conversation_id: &str, message: Message) {
        let now = (self.clock)();
        let outcome = self.state.add_message(conversation_id, message, now);
        self.report("add_message", outcome);
    }

    pub fn update_message(&mut self, conversation_id: &str, message_id: &str, patch: MessagePatch) {
        let now = (self.clock)();
        let outcome = self.state.update_message(conversation_id, message_id, patch, now);
        self.report("update_message", outcome);
    }

    pub fn create_conversation(&mut self, conversation: Conversation) {
        tracing::debug!(conversation_id = %conversation.id, "Creating conversation");
        self.state.create_conversation(conversation);
    }

    pub fn delete_conversation(&mut self, id: &str) {
        let outcome = self.state.delete_conversation(id);
        self.report("delete_conversation", outcome);
    }

    pub fn rename_conversation(&mut self, id: &str, title: impl Into<String>) {
        let outcome = self.state.rename_conversation(id, title.into());
        self.report("rename_conversation", outcome);
    }

    pub fn set_current_variant(&mut self, variant: impl Into<String>) {
        self.state.set_current_variant(variant.into());
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.state.set_typing(typing);
    }

    /// Update the draft and persist it for the active conversation.
    ///
    /// With no active conversation the draft stays in memory only.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(id) = self.state.active_conversation_id() {
            if let Err(e) = self.preferences.set_draft(id, &text) {
                self.observer.storage_error("set_draft", &e);
            }
        }
        self.state.set_draft(text);
    }

    /// Replace the draft with the one stored for `conversation_id`, or empty
    pub fn load_draft(&mut self, conversation_id: &str) {
        let stored = match self.preferences.draft(conversation_id) {
            Ok(stored) => stored,
            Err(e) => {
                self.observer.storage_error("load_draft", &e);
                None
            }
        };
        self.state.set_draft(stored.unwrap_or_default());
    }

    pub fn clear_draft(&mut self) {
        if let Some(id) = self.state.active_conversation_id() {
            if let Err(e) = self.preferences.remove_draft(id) {
                self.observer.storage_error("clear_draft", &e);
            }
        }
        self.state.set_draft(String::new());
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.set_search_query(query.into());
    }

    pub fn toggle_pin(&mut self, id: &str) {
        let outcome = self.state.toggle_pin(id);
        self.report("toggle_pin", outcome);
    }

    pub fn toggle_archive(&mut self, id: &str) {
        let outcome = self.state.toggle_archive(id);
        self.report("toggle_archive", outcome);
    }

    pub fn add_reaction(&mut self, conversation_id: &str, message_id: &str, reaction: &str) {
        let outcome = self.state.add_reaction(conversation_id, message_id, reaction);
        self.report("add_reaction", outcome);
    }

    pub fn remove_reaction(&mut self, conversation_id: &str, message_id: &str, reaction: &str) {
        let outcome = self.state.remove_reaction(conversation_id, message_id, reaction);
        self.report("remove_reaction", outcome);
    }
}
