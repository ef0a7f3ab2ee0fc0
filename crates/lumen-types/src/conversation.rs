use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single chat message inside a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    /// Deduplicated, kept in the order they were first added
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub edited: bool,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            variant: None,
            model: None,
            attachments: Vec::new(),
            reactions: Vec::new(),
            reply_to: None,
            edited: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Sender::Ai, content)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }

    /// Add a reaction unless it is already present. Returns whether the set changed.
    pub fn add_reaction(&mut self, reaction: impl Into<String>) -> bool {
        let reaction = reaction.into();
        if self.reactions.contains(&reaction) {
            return false;
        }
        self.reactions.push(reaction);
        true
    }

    pub fn remove_reaction(&mut self, reaction: &str) -> bool {
        let before = self.reactions.len();
        self.reactions.retain(|r| r != reaction);
        self.reactions.len() != before
    }

    /// Merge a partial update into this message.
    ///
    /// Returns `true` when the patch touched `content` or `edited`, i.e. when the
    /// owning conversation should consider itself updated.
    pub fn apply(&mut self, patch: MessagePatch) -> bool {
        let mut edited = false;
        if let Some(content) = patch.content {
            self.content = content;
            edited = true;
        }
        if let Some(variant) = patch.variant {
            self.variant = Some(variant);
        }
        if let Some(model) = patch.model {
            self.model = Some(model);
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = attachments;
        }
        if let Some(reactions) = patch.reactions {
            self.reactions.clear();
            for reaction in reactions {
                self.add_reaction(reaction);
            }
        }
        if let Some(reply_to) = patch.reply_to {
            self.reply_to = Some(reply_to);
        }
        if let Some(flag) = patch.edited {
            self.edited = flag;
            edited = true;
        }
        edited
    }
}

/// Partial update for [`Message`]. `None` fields are left untouched.
///
/// `edited` is never inferred: callers editing content should use
/// [`MessagePatch::edit`] or set it themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<bool>,
}

impl MessagePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and mark the message as edited
    pub fn edit(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            edited: Some(true),
            ..Self::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn edited(mut self, edited: bool) -> Self {
        self.edited = Some(edited);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_participants")]
    pub participant_count: u32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub archived: bool,
}

fn default_participants() -> u32 {
    1
}

impl Conversation {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            participant_count: default_participants(),
            tags: BTreeSet::new(),
            pinned: false,
            archived: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Advance `updated_at`, never moving it before `created_at` or backwards
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Case-insensitive substring match over the title or any message content.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}
