use chrono::{DateTime, Utc};
use lumen_types::{Conversation, Message, MessagePatch, DEFAULT_VARIANT};

use super::filter::filter_conversations;
use crate::observer::Target;

/// Result of a single state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The target resolved but the operation had nothing to change
    Unchanged,
    Missing(Target),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Pure chat state: every transition is in-memory and synchronous.
///
/// The filtered view is stored as positions into `conversations` and rebuilt
/// after every mutation, so it can never drift from the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    conversations: Vec<Conversation>,
    active_conversation_id: Option<String>,
    current_variant: String,
    is_typing: bool,
    draft: String,
    search_query: String,
    filtered: Vec<usize>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self::with_variant(DEFAULT_VARIANT)
    }

    pub fn with_variant(variant: impl Into<String>) -> Self {
        Self {
            conversations: Vec::new(),
            active_conversation_id: None,
            current_variant: variant.into(),
            is_typing: false,
            draft: String::new(),
            search_query: String::new(),
            filtered: Vec::new(),
        }
    }

    // Accessors

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn filtered_conversations(&self) -> Vec<&Conversation> {
        self.filtered.iter().map(|&i| &self.conversations[i]).collect()
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.active_conversation_id.as_deref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id
            .as_deref()
            .and_then(|id| self.conversation(id))
    }

    pub fn current_variant(&self) -> &str {
        &self.current_variant
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    fn refresh_view(&mut self) {
        self.filtered = filter_conversations(&self.conversations, &self.search_query);
    }

    // Transitions

    /// Replace the collection. An active pointer the new list no longer
    /// contains is cleared.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        if let Some(id) = self.active_conversation_id.as_deref() {
            if self.conversation(id).is_none() {
                self.active_conversation_id = None;
            }
        }
        self.refresh_view();
    }

    pub fn set_active_conversation(&mut self, id: Option<String>) {
        self.active_conversation_id = id;
    }

    pub fn add_message(
        &mut self,
        conversation_id: &str,
        message: Message,
        now: DateTime<Utc>,
    ) -> Outcome {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return Outcome::Missing(Target::Conversation(conversation_id.to_string()));
        };
        conversation.messages.push(message);
        conversation.touch(now);
        self.refresh_view();
        Outcome::Applied
    }

    pub fn update_message(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        patch: MessagePatch,
        now: DateTime<Utc>,
    ) -> Outcome {
        let missing = || {
            Outcome::Missing(Target::Message {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
            })
        };
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return missing();
        };
        let Some(message) = conversation.message_mut(message_id) else {
            return missing();
        };
        if message.apply(patch) {
            conversation.touch(now);
        }
        self.refresh_view();
        Outcome::Applied
    }

    /// Insert at the front and make it the active conversation
    pub fn create_conversation(&mut self, conversation: Conversation) {
        self.active_conversation_id = Some(conversation.id.clone());
        self.conversations.insert(0, conversation);
        self.refresh_view();
    }

    pub fn delete_conversation(&mut self, id: &str) -> Outcome {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.conversations.len() == before {
            return Outcome::Missing(Target::Conversation(id.to_string()));
        }
        if self.active_conversation_id.as_deref() == Some(id) {
            self.active_conversation_id = None;
        }
        self.refresh_view();
        Outcome::Applied
    }

    pub fn rename_conversation(&mut self, id: &str, title: String) -> Outcome {
        let Some(conversation) = self.conversation_mut(id) else {
            return Outcome::Missing(Target::Conversation(id.to_string()));
        };
        conversation.title = title;
        self.refresh_view();
        Outcome::Applied
    }

    pub fn set_current_variant(&mut self, variant: String) {
        self.current_variant = variant;
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.is_typing = typing;
    }

    /// In-memory only; persistence is the adapter's job
    pub fn set_draft(&mut self, text: String) {
        self.draft = text;
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
        self.refresh_view();
    }

    pub fn toggle_pin(&mut self, id: &str) -> Outcome {
        let Some(conversation) = self.conversation_mut(id) else {
            return Outcome::Missing(Target::Conversation(id.to_string()));
        };
        conversation.pinned = !conversation.pinned;
        self.refresh_view();
        Outcome::Applied
    }

    pub fn toggle_archive(&mut self, id: &str) -> Outcome {
        let Some(conversation) = self.conversation_mut(id) else {
            return Outcome::Missing(Target::Conversation(id.to_string()));
        };
        conversation.archived = !conversation.archived;
        self.refresh_view();
        Outcome::Applied
    }

    pub fn add_reaction(&mut self, conversation_id: &str, message_id: &str, reaction: &str) -> Outcome {
        let Some(message) = self
            .conversation_mut(conversation_id)
            .and_then(|c| c.message_mut(message_id))
        else {
            return Outcome::Missing(Target::Message {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
            });
        };
        if message.add_reaction(reaction) {
            Outcome::Applied
        } else {
            Outcome::Unchanged
        }
    }

    pub fn remove_reaction(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        reaction: &str,
    ) -> Outcome {
        let Some(message) = self
            .conversation_mut(conversation_id)
            .and_then(|c| c.message_mut(message_id))
        else {
            return Outcome::Missing(Target::Message {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
            });
        };
        if message.remove_reaction(reaction) {
            Outcome::Applied
        } else {
            Outcome::Unchanged
        }
    }
}
