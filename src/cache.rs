//! Time-bounded key/value cache with an injected clock.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use chrono::{DateTime, Duration, Utc};

use crate::time::Clock;

struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Owned cache whose entries expire `ttl` after insertion.
///
/// Expired entries are dropped lazily on lookup or eagerly via
/// [`ExpiringCache::purge_expired`].
pub struct ExpiringCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Inserts or replaces `key`, restarting its expiry.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let expires_at = self.clock.now() + self.ttl;
        self.entries
            .insert(key, Entry { value, expires_at })
            .map(|previous| previous.value)
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.clock.now();
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= now);
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    /// Number of entries currently held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
