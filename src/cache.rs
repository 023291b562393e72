use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Eviction rule applied by a [`Cache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Keep at most `capacity` entries; quick_cache picks victims (S3-FIFO).
    Lru { capacity: usize },
    /// Treat entries older than the TTL as absent; expiry is checked lazily on `get`.
    Ttl(Duration),
}

struct Stamped<V> {
    value: V,
    inserted_at: Instant,
}

enum Store<K, V> {
    Bounded(quick_cache::sync::Cache<K, V>),
    Expiring {
        ttl: Duration,
        entries: Mutex<HashMap<K, Stamped<V>>>,
    },
}

/// Thread-safe key/value store shared by concurrent orchestrations.
///
/// Values are handed out by clone, so callers typically store `Arc`s. Entries are
/// never edited in place; `set` replaces whatever was there.
pub struct Cache<K, V> {
    store: Store<K, V>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(policy: CachePolicy) -> Self {
        let store = match policy {
            CachePolicy::Lru { capacity } => {
                Store::Bounded(quick_cache::sync::Cache::new(capacity.max(1)))
            }
            CachePolicy::Ttl(ttl) => Store::Expiring {
                ttl,
                entries: Mutex::new(HashMap::new()),
            },
        };
        Self { store }
    }

    pub fn lru(capacity: usize) -> Self {
        Self::new(CachePolicy::Lru { capacity })
    }

    pub fn ttl(ttl: Duration) -> Self {
        Self::new(CachePolicy::Ttl(ttl))
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn set(&self, key: K, value: V) {
        self.set_at(key, value, Instant::now());
    }

    pub fn len(&self) -> usize {
        match &self.store {
            Store::Bounded(cache) => cache.len(),
            Store::Expiring { entries, .. } => lock(entries).len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        match &self.store {
            Store::Bounded(cache) => cache.get(key),
            Store::Expiring { ttl, entries } => {
                let mut entries = lock(entries);
                let expired = now.saturating_duration_since(entries.get(key)?.inserted_at) >= *ttl;
                if expired {
                    entries.remove(key);
                    return None;
                }
                entries.get(key).map(|entry| entry.value.clone())
            }
        }
    }

    pub(crate) fn set_at(&self, key: K, value: V, now: Instant) {
        match &self.store {
            Store::Bounded(cache) => cache.insert(key, value),
            Store::Expiring { entries, .. } => {
                lock(entries).insert(
                    key,
                    Stamped {
                        value,
                        inserted_at: now,
                    },
                );
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Entries are replaced whole, so a panic mid-update cannot leave one half-written.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
