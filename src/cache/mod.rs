//! Response caching.
//!
//! # Responsibilities
//! - Hold recent provider responses keyed by normalized path + query
//! - Expire entries after a configured TTL
//! - Evict stale entries on read and in a periodic background sweep
//!
//! # Design Decisions
//! - Concurrent map, no global lock
//! - TTL only; no size bound (the key space is the validated API surface)

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::provider::ProviderResponse;

struct CacheEntry {
    response: ProviderResponse,
    stored_at: Instant,
}

/// A thread-safe TTL cache for provider responses.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Look up a fresh entry, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<ProviderResponse> {
        let stale = match self.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.response.clone());
            }
            Some(_) => true,
            None => false,
        };
        if stale {
            self.entries.remove(key);
        }
        None
    }

    /// Store a response under `key`, replacing any previous entry.
    pub fn insert(&self, key: String, response: ProviderResponse) {
        self.entries.insert(
            key,
            CacheEntry {
                response,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop all expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        before - self.entries.len()
    }

    /// Number of stored entries, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn response(body: &str) -> ProviderResponse {
        ProviderResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        assert!(cache.get("teams/42").is_none());

        cache.insert("teams/42".into(), response("{\"id\":42}"));
        let hit = cache.get("teams/42").unwrap();
        assert_eq!(hit.status, 200);
        assert_eq!(hit.body, Bytes::from_static(b"{\"id\":42}"));
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.insert("fixtures".into(), response("[]"));

        assert!(cache.get("fixtures").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_purge_expired_counts_removals() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.insert("a".into(), response("1"));
        cache.insert("b".into(), response("2"));

        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fresh_entries_survive_purge() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("a".into(), response("1"));

        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.len(), 1);
    }
}
