use std::sync::Arc;
use std::time::Duration;

use lumen_types::Conversation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::{CacheKey, CacheStats, QueryCache};
use crate::error::Result;
use crate::tags::Tag;
use crate::transport::{HttpTransport, Transport, Upload};

pub const SEND_MESSAGE_PATH: &str = "/api/chat/send";
pub const SYSTEM_STATUS_PATH: &str = "/api/status";
pub const CONVERSATIONS_PATH: &str = "/api/conversations";
pub const UPLOAD_PATH: &str = "/api/upload";

/// Body of a chat send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub variant_id: String,
}

/// Assistant reply to a chat send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(alias = "response")]
    pub content: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
}

/// Backend health report. Fields beyond `status` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl SystemStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy" | "operational")
    }
}

#[derive(Debug, Serialize)]
struct CreateConversationRequest<'a> {
    title: &'a str,
}

/// Typed endpoints for the Lumen backend, fronted by a [`QueryCache`].
///
/// Queries are served from the cache while fresh. Mutations always hit the
/// backend and invalidate the tags they affect once the backend accepts them.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    cache: Arc<QueryCache>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_cache(transport, Arc::new(QueryCache::default()))
    }

    pub fn with_cache(transport: Arc<dyn Transport>, cache: Arc<QueryCache>) -> Self {
        Self { transport, cache }
    }

    /// HTTP client against `base_url`
    pub fn http(base_url: impl Into<String>, timeout: Duration, keep_unused_for: Duration) -> Result<Self> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::with_cache(
            Arc::new(transport),
            Arc::new(QueryCache::new(keep_unused_for)),
        ))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached result
    pub fn reset(&self) {
        self.cache.reset();
    }

    async fn query<T: DeserializeOwned>(
        &self,
        key: CacheKey,
        path: &str,
        tags: &[Tag],
        force: bool,
    ) -> Result<T> {
        if !force {
            if let Some(data) = self.cache.fresh(&key) {
                return Ok(serde_json::from_value(data)?);
            }
        }

        let seq = self.cache.begin(&key, tags);
        let fetched = self
            .transport
            .get(path)
            .await
            .and_then(|data| Ok((serde_json::from_value::<T>(data.clone())?, data)));
        let (parsed, data) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                self.cache.cancel(&key, seq);
                return Err(e);
            }
        };

        if self.cache.complete(&key, seq, data, tags) {
            return Ok(parsed);
        }
        // A newer response landed first; hand back that one
        match self.cache.data(&key) {
            Some(newer) => Ok(serde_json::from_value(newer)?),
            None => Ok(parsed),
        }
    }

    async fn mutate<T: DeserializeOwned>(&self, path: &str, body: Value, invalidates: &[Tag]) -> Result<T> {
        let data = self.transport.post_json(path, body).await?;
        self.cache.invalidate_tags(invalidates);
        Ok(serde_json::from_value(data)?)
    }

    /// Send a user message to the given assistant variant
    pub async fn send_message(&self, message: impl Into<String>, variant_id: impl Into<String>) -> Result<ChatReply> {
        let request = ChatRequest {
            message: message.into(),
            variant_id: variant_id.into(),
        };
        self.mutate(SEND_MESSAGE_PATH, serde_json::to_value(&request)?, &[])
            .await
    }

    pub async fn system_status(&self) -> Result<SystemStatus> {
        self.query(
            CacheKey::endpoint("system_status"),
            SYSTEM_STATUS_PATH,
            &[Tag::System],
            false,
        )
        .await
    }

    /// Conversation list. `force` skips the cache even when it is fresh.
    pub async fn conversations(&self, force: bool) -> Result<Vec<Conversation>> {
        self.query(
            CacheKey::endpoint("conversations"),
            CONVERSATIONS_PATH,
            &[Tag::Conversations],
            force,
        )
        .await
    }

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let body = serde_json::to_value(CreateConversationRequest { title })?;
        self.mutate(CONVERSATIONS_PATH, body, &[Tag::Conversations])
            .await
    }

    /// Upload a file; the backend's reply is returned untouched
    pub async fn upload(&self, upload: Upload) -> Result<Value> {
        self.transport.post_multipart(UPLOAD_PATH, upload).await
    }

    /// Warm the cache with every query endpoint concurrently
    pub async fn prefetch(&self) -> Result<(SystemStatus, Vec<Conversation>)> {
        futures::try_join!(self.system_status(), self.conversations(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            message: "hello".into(),
            variant_id: "sanctuary-guide".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"message": "hello", "variant_id": "sanctuary-guide"})
        );
    }

    #[test]
    fn test_chat_reply_accepts_response_alias() {
        let reply: ChatReply = serde_json::from_value(json!({"response": "hi there"})).unwrap();
        assert_eq!(reply.content, "hi there");
        assert_eq!(reply.model, None);
    }

    #[test]
    fn test_system_status_keeps_extra_fields() {
        let status: SystemStatus = serde_json::from_value(json!({
            "status": "healthy",
            "agents": 4,
        }))
        .unwrap();
        assert!(status.is_healthy());
        assert_eq!(status.details.get("agents"), Some(&json!(4)));
    }
}
