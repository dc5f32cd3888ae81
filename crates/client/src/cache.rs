//! Time-bounded response cache.
//!
//! Entries are keyed by the fully-qualified request URL and carry the cache
//! tag of the query that produced them. An entry older than its budget is
//! never served. It is dropped on the next lookup of its key or on the next
//! insert of any key.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for staleness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
struct CachedResponse {
    body: Arc<str>,
    tag: String,
    fetched_at: DateTime<Utc>,
    max_age: Duration,
}

impl CachedResponse {
    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) > self.max_age
    }
}

pub struct ResponseCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Fresh body for `key`, if any. A stale entry is evicted.
    pub fn get(&self, key: &str) -> Option<Arc<str>> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_stale(now) => return Some(Arc::clone(&entry.body)),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have refreshed the entry in between.
        if entries.get(key).is_some_and(|entry| entry.is_stale(now)) {
            entries.remove(key);
        }
        entries
            .get(key)
            .filter(|entry| !entry.is_stale(now))
            .map(|entry| Arc::clone(&entry.body))
    }

    /// Store `body` under `key`, sweeping out every expired entry first.
    pub fn insert(&self, key: impl Into<String>, tag: impl Into<String>, body: Arc<str>, max_age: Duration) {
        let now = self.clock.now();
        let entry = CachedResponse {
            body,
            tag: tag.into(),
            fetched_at: now,
            max_age,
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, cached| !cached.is_stale(now));
        entries.insert(key.into(), entry);
    }

    /// Drop every entry stored under `tag`; returns how many were removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.tag != tag);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache").field("entries", &self.len()).finish()
    }
}
