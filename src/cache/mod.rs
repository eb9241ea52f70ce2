//! Cache-aside plumbing shared by the read endpoints.
//!
//! The cache is an optimization only: read and write failures are logged and
//! treated as a miss, never surfaced to the caller.

mod memory;
mod redis_store;

pub use memory::MemoryCache;
pub use redis_store::RedisCache;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> Result<(), CacheError>;
}

/// Expiry per cached payload type, in seconds.
pub struct CacheTtl;

impl CacheTtl {
    pub const USER_STATS: u64 = 300;
    pub const INTERVIEW_LIST: u64 = 60;
    pub const FEEDBACK: u64 = 600;
}

pub fn cache_key(prefix: &str, parts: &[&str]) -> String {
    let mut key = String::from(prefix);
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}

/// Connects to Redis when a URL is configured, otherwise (or when the
/// connection fails) falls back to a process-local cache.
pub async fn connect(redis_url: Option<&str>) -> Arc<dyn CacheStore> {
    let Some(url) = redis_url else {
        tracing::info!("REDIS_URL not set, using in-memory cache");
        return Arc::new(MemoryCache::new());
    };

    match RedisCache::connect(url).await {
        Ok(cache) => {
            tracing::info!("Redis cache connected");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!("Redis unavailable ({}), continuing with in-memory cache", e);
            Arc::new(MemoryCache::new())
        }
    }
}

/// Returns the cached value for `key` unless `force_refresh` is set or the
/// entry is missing, unreadable or malformed; otherwise runs `compute`, stores
/// its result for `ttl_secs` and returns it.
///
/// Only an error from `compute` is propagated.
pub async fn read_through<T, E, F, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    ttl_secs: u64,
    force_refresh: bool,
    compute: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if !force_refresh {
        match cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    tracing::debug!("Cache hit for {}", key);
                    return Ok(value);
                }
                Err(e) => tracing::warn!("Discarding malformed cache entry {}: {}", key, e),
            },
            Ok(None) => tracing::debug!("Cache miss for {}", key),
            Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
        }
    }

    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = cache.set_ex(key, ttl_secs, raw).await {
                tracing::warn!("Failed to cache {}: {}", key, e);
            }
        }
        Err(e) => tracing::warn!("Failed to serialize {} for caching: {}", key, e),
    }

    Ok(value)
}
