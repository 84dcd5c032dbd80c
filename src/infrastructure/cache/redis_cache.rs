//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Redis cache for statistics payloads.
///
/// Uses `ConnectionManager` for automatic reconnection. Group membership is
/// tracked in a Redis set named `cache_group:{group}` and the group
/// generation in `cache_gen:{group}`. Reads, writes and invalidation are
/// fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }

    fn group_key(group: &str) -> String {
        format!("cache_group:{}", group)
    }

    fn generation_key(group: &str) -> String {
        format!("cache_gen:{}", group)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("Redis GET error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, group: &str, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let result = redis::pipe()
            .atomic()
            .set_ex(key, value, ttl_seconds)
            .ignore()
            .sadd(Self::group_key(group), key)
            .ignore()
            .query_async::<()>(&mut conn)
            .await;

        match result {
            Ok(()) => {
                debug!("Cache SET: {} (group: {}, TTL: {}s)", key, group, ttl_seconds);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn invalidate_group(&self, group: &str) -> CacheResult<()> {
        let group_key = Self::group_key(group);
        let mut conn = self.client.clone();

        if let Err(e) = conn.incr::<_, _, i64>(Self::generation_key(group), 1).await {
            warn!("Redis INCR error for group {}: {}", group, e);
        }

        let mut keys: Vec<String> = match conn.smembers(&group_key).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Redis SMEMBERS error for {}: {}", group_key, e);
                return Ok(());
            }
        };
        keys.push(group_key);

        match conn.del::<_, i64>(&keys).await {
            Ok(deleted) => {
                debug!("Cache INVALIDATE group {}: {} keys", group, deleted);
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for group {}: {}", group, e);
                Ok(())
            }
        }
    }

    async fn generation(&self, group: &str) -> CacheResult<u64> {
        let mut conn = self.client.clone();

        conn.get::<_, Option<u64>>(Self::generation_key(group))
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                CacheError::OperationError(format!("Redis GET generation for {}: {}", group, e))
            })
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
