//! Backend access for Lumen clients.
//!
//! [`ApiClient`] exposes the backend endpoints as typed async calls. Query
//! results are held in a [`QueryCache`] keyed by endpoint and arguments;
//! mutations invalidate cache [`Tag`]s so dependent queries refetch on next
//! access. Responses are sequenced per key, so an out-of-order arrival never
//! replaces a newer result.
//!
//! ```no_run
//! use std::time::Duration;
//! use lumen_api::ApiClient;
//!
//! # async fn demo() -> lumen_api::Result<()> {
//! let api = ApiClient::http(
//!     "http://localhost:8000",
//!     Duration::from_secs(30),
//!     Duration::from_secs(60),
//! )?;
//! let conversations = api.conversations(false).await?;
//! api.create_conversation("Weekly sync").await?;
//! // The list above is now stale and is refetched here
//! let refreshed = api.conversations(false).await?;
//! # let _ = (conversations, refreshed);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod tags;
pub mod transport;

pub use cache::{CacheKey, CacheStats, QueryCache, DEFAULT_KEEP_UNUSED_FOR};
pub use client::{ApiClient, ChatReply, ChatRequest, SystemStatus};
pub use error::{ApiError, Result};
pub use tags::Tag;
pub use transport::{HttpTransport, Transport, Upload};
