use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::ActivitySummary;

/// Errors that can occur while setting up the cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier cache for GitHub activity summaries
///
/// L1 is an in-process moka cache, L2 is Redis shared across instances, both
/// holding entries for the configured TTL so a ranking request does not
/// re-fetch a candidate's activity within the window.
///
/// Reads and writes degrade rather than fail: a broken cache tier means the
/// caller falls through to a live fetch, never an error.
pub struct ActivityCache {
    // ConnectionManager needs interior mutability for command dispatch
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1: moka::future::Cache<String, ActivitySummary>,
    ttl_secs: u64,
}

impl ActivityCache {
    /// Create a new activity cache
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1 = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1,
            ttl_secs,
        })
    }

    /// Get a cached summary (L1 first, then L2)
    pub async fn get(&self, user_id: &str) -> Option<ActivitySummary> {
        let key = Self::key(user_id);

        if let Some(summary) = self.l1.get(&key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Some(summary);
        }

        let value: Option<String> = {
            let mut conn = self.redis.lock().await;
            match redis::cmd("GET").arg(&key).query_async(&mut *conn).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Redis GET failed for {}: {}", key, e);
                    return None;
                }
            }
        };

        let json = value?;
        match serde_json::from_str::<ActivitySummary>(&json) {
            Ok(summary) => {
                tracing::trace!("L2 cache hit: {}", key);
                self.l1.insert(key, summary.clone()).await;
                Some(summary)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Store a summary in both tiers (best-effort)
    pub async fn put(&self, user_id: &str, summary: &ActivitySummary) {
        let key = Self::key(user_id);

        self.l1.insert(key.clone(), summary.clone()).await;

        let json = match serde_json::to_string(summary) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize activity summary for {}: {}", key, e);
                return;
            }
        };

        let mut conn = self.redis.lock().await;
        let stored: Result<(), redis::RedisError> = redis::cmd("SETEX")
            .arg(&key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async(&mut *conn)
            .await;
        if let Err(e) = stored {
            tracing::warn!("Redis SETEX failed for {}: {}", key, e);
        }
    }

    /// Drop a user's cached summary from both tiers
    pub async fn invalidate(&self, user_id: &str) {
        let key = Self::key(user_id);

        self.l1.invalidate(&key).await;

        let mut conn = self.redis.lock().await;
        let dropped: Result<(), redis::RedisError> = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut *conn)
            .await;
        if let Err(e) = dropped {
            tracing::warn!("Redis DEL failed for {}: {}", key, e);
        }
    }

    fn key(user_id: &str) -> String {
        format!("activity:{}", user_id)
    }
}
