//! In-memory LRU cache of band files, usable as a [`CacheHook`].

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::hook::CacheHook;

/// In-memory LRU cache for band file bytes.
///
/// Filled as a side effect of scene fetches so later jobs over the same
/// scenes can skip the remote read.
pub struct BandCache {
    /// LRU cache storing key -> band file bytes
    cache: Mutex<LruCache<String, Bytes>>,
    /// Cache statistics
    stats: Mutex<CacheStats>,
    capacity: usize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub bytes_cached: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl BandCache {
    /// Create a cache holding at most `capacity` band files.
    ///
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let cache_size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Mutex::new(LruCache::new(cache_size)),
            stats: Mutex::new(CacheStats::default()),
            capacity: cache_size.get(),
        }
    }

    /// Look up a band file.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let found = self.cache.lock().await.get(key).cloned();

        let mut stats = self.stats.lock().await;
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Insert a band file, evicting the least recently used entry when full.
    pub async fn insert(&self, key: &str, data: Bytes) {
        let size = data.len() as u64;
        let evicted = self.cache.lock().await.push(key.to_string(), data);

        let mut stats = self.stats.lock().await;
        stats.inserts += 1;
        stats.bytes_cached += size;
        if let Some((old_key, old)) = evicted {
            stats.bytes_cached -= old.len() as u64;
            // push also returns the previous value of a replaced key
            if old_key != key {
                stats.evictions += 1;
                debug!(key = %old_key, "Evicted band from cache");
            }
        }
    }

    /// Get current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }

    /// Get current cache size (number of entries).
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }

    /// Clear all cached entries.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
        *self.stats.lock().await = CacheStats::default();
    }

    /// Get cache capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl CacheHook for BandCache {
    async fn store(&self, key: &str, data: Bytes) {
        self.insert(key, data).await;
    }
}
