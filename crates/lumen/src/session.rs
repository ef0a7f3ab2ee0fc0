use anyhow::{bail, Result};
use lumen_api::ApiClient;
use lumen_store::ChatStore;
use lumen_types::{Conversation, Message};

/// Longest title derived from a first message, in characters
const DERIVED_TITLE_LEN: usize = 48;

/// Drives a conversation: local chat state on one side, the backend on the other.
pub struct ChatSession<'a> {
    chat: &'a mut ChatStore,
    api: &'a ApiClient,
}

impl<'a> ChatSession<'a> {
    pub fn new(chat: &'a mut ChatStore, api: &'a ApiClient) -> Self {
        Self { chat, api }
    }

    pub fn chat(&self) -> &ChatStore {
        self.chat
    }

    /// Replace local conversations with the backend list
    pub async fn sync_conversations(&mut self, force: bool) -> Result<usize> {
        let conversations = self.api.conversations(force).await?;
        let count = conversations.len();
        self.chat.set_conversations(conversations);
        tracing::info!(count, "Synced conversations");
        Ok(count)
    }

    /// Create a conversation on the backend, make it active and restore its draft
    pub async fn start_conversation(&mut self, title: &str) -> Result<String> {
        let conversation = self.api.create_conversation(title).await?;
        let id = conversation.id.clone();
        self.chat.create_conversation(conversation);
        self.chat.load_draft(&id);
        Ok(id)
    }

    /// Send `text` in the active conversation and record the reply.
    ///
    /// Without an active conversation that still exists, a local one is
    /// opened, titled after the message. The user message is recorded and the
    /// draft cleared before the request goes out; the typing flag is raised
    /// for the duration of the request and lowered whether it succeeds or not.
    pub async fn send(&mut self, text: &str) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Refusing to send an empty message");
        }

        let conversation_id = match self.chat.active_conversation() {
            Some(conversation) => conversation.id.clone(),
            None => {
                let conversation = Conversation::new(derive_title(text));
                let id = conversation.id.clone();
                self.chat.create_conversation(conversation);
                id
            }
        };
        let variant = self.chat.current_variant().to_string();

        self.chat.add_message(
            &conversation_id,
            Message::user(text).with_variant(variant.clone()),
        );
        self.chat.clear_draft();

        self.chat.set_typing(true);
        let result = self.api.send_message(text, variant.clone()).await;
        self.chat.set_typing(false);

        let reply = result?;
        let mut message = Message::ai(reply.content).with_variant(reply.variant.unwrap_or(variant));
        if let Some(model) = reply.model {
            message = message.with_model(model);
        }

        self.chat.add_message(&conversation_id, message.clone());
        Ok(message)
    }
}

fn derive_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or(text);
    let mut title: String = first_line.chars().take(DERIVED_TITLE_LEN).collect();
    if first_line.chars().count() > DERIVED_TITLE_LEN {
        title.push('…');
    }
    title
}
