// Query cache (in-memory, tag-invalidated, sequence-ordered)

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::tags::Tag;

/// How long an unused result stays fresh
pub const DEFAULT_KEEP_UNUSED_FOR: Duration = Duration::from_secs(60);

/// Identifies one query result: endpoint name plus its serialized arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    endpoint: String,
    args: String,
}

impl CacheKey {
    pub fn new(endpoint: impl Into<String>, args: &Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            args: args.to_string(),
        }
    }

    /// Key for an endpoint that takes no arguments
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, &Value::Null)
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

#[derive(Debug, Default)]
struct Entry {
    data: Option<Value>,
    tags: BTreeSet<Tag>,
    fetched_at: Option<Instant>,
    /// Highest sequence handed out for this key
    issued: u64,
    /// Sequence of the response currently stored
    applied: u64,
    /// Responses with a sequence at or below this are stale
    stale_through: u64,
    /// Requests begun but neither completed nor cancelled
    pending: u64,
}

impl Entry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        let Some(fetched_at) = self.fetched_at else {
            return false;
        };
        self.data.is_some() && self.applied > self.stale_through && fetched_at.elapsed() <= ttl
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() > ttl)
    }
}

/// Counters describing the cache contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub discarded_responses: u64,
    /// Keys known to the cache, including those with nothing stored yet
    pub tracked_keys: usize,
    pub pending_requests: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    hits: u64,
    misses: u64,
    discarded: u64,
}

/// Result cache for query endpoints.
///
/// Every fetch for a key takes a sequence number from [`QueryCache::begin`]
/// and hands it back to [`QueryCache::complete`]. A response is stored only if
/// its sequence is newer than the one already stored, so a slow response can
/// never overwrite a faster, newer one. Invalidating a tag marks every entry
/// carrying it stale, including responses still in flight when the
/// invalidation happened.
///
/// The lock is never held across an `.await`.
#[derive(Debug)]
pub struct QueryCache {
    inner: Mutex<Inner>,
    keep_unused_for: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_UNUSED_FOR)
    }
}

impl QueryCache {
    pub fn new(keep_unused_for: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            keep_unused_for,
        }
    }

    pub fn keep_unused_for(&self) -> Duration {
        self.keep_unused_for
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stored result for `key` if it is neither invalidated nor expired
    pub fn fresh(&self, key: &CacheKey) -> Option<Value> {
        let ttl = self.keep_unused_for;
        let mut inner = self.lock();
        let hit = inner
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .and_then(|entry| entry.data.clone());

        match hit {
            Some(data) => {
                inner.hits += 1;
                tracing::debug!(key = %key, "Cache hit");
                Some(data)
            }
            None => {
                inner.misses += 1;
                tracing::debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    /// Stored result for `key` regardless of freshness
    pub fn data(&self, key: &CacheKey) -> Option<Value> {
        self.lock().entries.get(key).and_then(|entry| entry.data.clone())
    }

    /// Reserve the next request sequence for `key`.
    ///
    /// `tags` are attached right away so an invalidation that lands while
    /// the first fetch is still in flight reaches it. Every sequence handed
    /// out must end in [`QueryCache::complete`] or [`QueryCache::cancel`].
    pub fn begin(&self, key: &CacheKey, tags: &[Tag]) -> u64 {
        let mut inner = self.lock();
        let entry = inner.entries.entry(key.clone()).or_default();
        entry.tags.extend(tags.iter().copied());
        entry.issued += 1;
        entry.pending += 1;
        entry.issued
    }

    /// Give up on the request holding sequence `seq`
    pub fn cancel(&self, key: &CacheKey, seq: u64) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            entry.pending = entry.pending.saturating_sub(1);
            tracing::debug!(key = %key, seq, pending = entry.pending, "Cancelled request");
        }
    }

    /// Store a response fetched under sequence `seq`.
    ///
    /// Returns `false` when a newer response has already been stored, in
    /// which case `data` is dropped.
    pub fn complete(&self, key: &CacheKey, seq: u64, data: Value, tags: &[Tag]) -> bool {
        let mut inner = self.lock();
        let entry = inner.entries.entry(key.clone()).or_default();
        entry.pending = entry.pending.saturating_sub(1);

        if seq <= entry.applied {
            let applied = entry.applied;
            inner.discarded += 1;
            tracing::debug!(key = %key, seq, applied, "Discarding out-of-order response");
            return false;
        }

        entry.data = Some(data);
        entry.tags = tags.iter().copied().collect();
        entry.fetched_at = Some(Instant::now());
        entry.applied = seq;
        entry.issued = entry.issued.max(seq);
        true
    }

    /// Mark every entry carrying one of `tags` stale. Returns how many were hit.
    pub fn invalidate_tags(&self, tags: &[Tag]) -> usize {
        if tags.is_empty() {
            return 0;
        }

        let mut inner = self.lock();
        let mut count = 0;
        for entry in inner.entries.values_mut() {
            if tags.iter().any(|tag| entry.tags.contains(tag)) {
                entry.stale_through = entry.issued;
                count += 1;
            }
        }
        tracing::debug!(?tags, entries = count, "Invalidated cache tags");
        count
    }

    /// Mark a single key stale
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            entry.stale_through = entry.issued;
        }
    }

    /// Drop every stored result and counter.
    ///
    /// Sequence numbers survive so responses already in flight are stored
    /// as stale rather than fresh.
    pub fn reset(&self) {
        let mut inner = self.lock();
        for entry in inner.entries.values_mut() {
            entry.data = None;
            entry.tags.clear();
            entry.fetched_at = None;
            entry.stale_through = entry.issued;
        }
        inner.hits = 0;
        inner.misses = 0;
        inner.discarded = 0;
        tracing::info!("Query cache reset");
    }

    /// Remove entries whose result has expired or that hold nothing.
    ///
    /// Entries with a request in flight are kept so its sequence still
    /// orders against later ones.
    pub fn cleanup_expired(&self) -> usize {
        let ttl = self.keep_unused_for;
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| {
            entry.pending > 0 || (entry.data.is_some() && !entry.is_expired(ttl))
        });
        let removed = before - inner.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Removed unused cache entries");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let ttl = self.keep_unused_for;
        let inner = self.lock();
        let stored: Vec<&Entry> = inner.entries.values().filter(|e| e.data.is_some()).collect();
        let fresh = stored.iter().filter(|e| e.is_fresh(ttl)).count();

        CacheStats {
            total_entries: stored.len(),
            fresh_entries: fresh,
            stale_entries: stored.len() - fresh,
            hits: inner.hits,
            misses: inner.misses,
            discarded_responses: inner.discarded,
            tracked_keys: inner.entries.len(),
            pending_requests: inner.entries.values().map(|e| e.pending).sum(),
        }
    }
}
