//! Expiring key/value cache used for choice lists.
//!
//! # Design
//! The cache is injected wherever it is needed, never global. `MemoryCache`
//! is a concurrent map without any locking around the computation that fills
//! it: two callers that miss at the same time both fetch and the last write
//! wins. Time comes from a `Clock` so expiry can be tested deterministically.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Key → value store with per-entry time-to-live.
pub trait Cache<V>: Send + Sync {
    /// The value stored under `key`, unless absent or expired.
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V, ttl: Duration);
    fn delete(&self, key: &str);
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local `Cache` backed by a `DashMap`.
pub struct MemoryCache<V, C = SystemClock> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: C,
    _value: PhantomData<fn() -> V>,
}

impl<V> MemoryCache<V, SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V> Default for MemoryCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C: Clock> MemoryCache<V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            _value: PhantomData,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<V, C> Cache<V> for MemoryCache<V, C>
where
    V: Clone + Send + Sync,
    C: Clock,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let removed = self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now));
        if removed.is_some() {
            tracing::trace!(key, "cache entry expired");
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn miss_on_empty_cache() {
        let cache: MemoryCache<u32> = MemoryCache::new();
        assert_eq!(cache.get("missing"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn hit_within_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(clock.clone());
        cache.set("k", vec![1, 2], Duration::from_secs(60));

        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get("k"), Some(vec![1, 2]));
    }

    #[test]
    fn expired_at_ttl_boundary() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(clock.clone());
        cache.set("k", "v".to_string(), Duration::from_secs(60));

        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", 1, Duration::from_secs(60));
        cache.set("k", 2, Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn keys_are_independent() {
        let cache = MemoryCache::new();
        cache.set("a", 1, Duration::from_secs(60));
        cache.set("b", 2, Duration::from_secs(60));
        cache.delete("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_expiry_is_inclusive() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: (),
            expires_at: now + Duration::from_secs(1),
        };
        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::from_secs(1)));
    }
}
