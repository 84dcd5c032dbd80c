//! Cache service trait, error types and JSON helpers.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Group holding every statistics entry; invalidated on any write.
pub const STATS_GROUP: &str = "stats";

/// Trait for caching serialized statistics payloads.
///
/// Entries belong to a named group so that a write can drop every dependent
/// entry at once. Implementations are fail-open: backend errors are logged
/// and surface as misses or no-ops, never as request failures.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns `Ok(None)` on a miss or backend error.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds` and registers the key in `group`.
    async fn set(&self, group: &str, key: &str, value: &str, ttl_seconds: u64)
    -> CacheResult<()>;

    /// Drops every key registered in `group` and bumps its generation.
    async fn invalidate_group(&self, group: &str) -> CacheResult<()>;

    /// Current generation of `group`. Starts at 0.
    async fn generation(&self, group: &str) -> CacheResult<u64>;

    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}

/// Reads and decodes a cached JSON value. Undecodable entries count as misses.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding undecodable cache entry");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "cache read failed");
            None
        }
    }
}

/// Encodes and stores a JSON value in the statistics group.
pub async fn set_json<T: Serialize + Sync>(
    cache: &dyn CacheService,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to encode cache entry");
            return;
        }
    };

    if let Err(e) = cache.set(STATS_GROUP, key, &raw, ttl_seconds).await {
        tracing::warn!(key, error = %e, "cache write failed");
    }
}

/// Serves `key` from the statistics group, running `compute` on a miss.
///
/// Keys are stamped with the group generation read before `compute` starts,
/// so a value computed across an invalidation is stored under a generation
/// nobody reads any more.
pub async fn cached_json<T, E, F, Fut>(
    cache: &dyn CacheService,
    key: &str,
    ttl_seconds: u64,
    compute: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned + Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let generation = match cache.generation(STATS_GROUP).await {
        Ok(generation) => generation,
        Err(e) => {
            tracing::warn!(key, error = %e, "cache generation unavailable, bypassing cache");
            return compute().await;
        }
    };
    let stamped = format!("{key}@{generation}");

    if let Some(cached) = get_json(cache, &stamped).await {
        return Ok(cached);
    }

    let value = compute().await?;
    set_json(cache, &stamped, &value, ttl_seconds).await;
    Ok(value)
}

/// Drops every cached statistic. Called after any write.
pub async fn invalidate_stats(cache: &dyn CacheService) {
    if let Err(e) = cache.invalidate_group(STATS_GROUP).await {
        tracing::warn!(error = %e, "failed to invalidate statistics cache");
    }
}
