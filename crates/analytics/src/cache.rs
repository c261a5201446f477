use std::{hash::Hash, sync::Arc};

use jiff::Timestamp;
use mini_moka::sync::Cache;

use crate::clock::Clock;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    expires_at: Timestamp,
}

/// Bounded cache whose entries expire at an explicit instant of the injected
/// clock. Writes replace whole values; readers never observe a partial entry.
pub(crate) struct ExpiringCache<K, V> {
    inner: Cache<K, Entry<V>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(max_entries: u64, clock: Arc<dyn Clock>) -> Self {
        let inner = Cache::builder().max_capacity(max_entries).build();

        Self { inner, clock }
    }

    /// Returns the value if it has not expired yet. Expired entries are removed.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.inner.get(key)?;

        if self.clock.now() < entry.expires_at {
            return Some(entry.value);
        }

        self.inner.invalidate(key);

        None
    }

    pub fn insert(&self, key: K, value: V, expires_at: Timestamp) {
        self.inner.insert(key, Entry { value, expires_at });
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }
}
