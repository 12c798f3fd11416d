//! The caching hook invoked on every successful band retrieval.

use async_trait::async_trait;
use bytes::Bytes;

/// Receives each band file fetched by a scene fetcher.
///
/// Hooks are shared by every in-flight fetch, so implementations must be
/// safe to call concurrently.
#[async_trait]
pub trait CacheHook: Send + Sync {
    /// Called with the object key (or URL) and the raw bytes of a band file.
    async fn store(&self, key: &str, data: Bytes);
}

#[async_trait]
impl<F> CacheHook for F
where
    F: Fn(&str, &Bytes) + Send + Sync,
{
    async fn store(&self, key: &str, data: Bytes) {
        self(key, &data)
    }
}
