use async_trait::async_trait;
use redis::{ErrorKind, RedisError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::{
    errors::{GatewayError, Result},
    models::ConsumeOutcome,
    services::{quota_store::QuotaStore, redis::RedisService},
};

// Check and increment in one round trip so two concurrent requests from the
// same identity can never both see a count under the limit.
const CONSUME_SCRIPT: &str = r#"
    local key = KEYS[1]
    local limit = tonumber(ARGV[1])
    local ttl = tonumber(ARGV[2])

    local current = tonumber(redis.call('GET', key) or '0')
    if current >= limit then
        return {0, current}
    end

    local count = redis.call('INCR', key)
    if count == 1 then
        redis.call('EXPIRE', key, ttl)
    end

    return {1, count}
"#;

/// Minimum gap between two connection attempts while Redis is unreachable.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Default)]
struct ConnectionSlot {
    redis: Option<RedisService>,
    last_attempt: Option<Instant>,
}

/// Fixed-window daily counters in Redis.
///
/// The connection is opened on first use rather than at construction, so a
/// Redis that is down at boot is picked up once it comes back. Once opened,
/// the `ConnectionManager` handles reconnects itself.
pub struct RedisQuotaStore {
    redis_url: String,
    token: Option<String>,
    slot: Mutex<ConnectionSlot>,
    script: redis::Script,
}

impl RedisQuotaStore {
    pub fn new(redis_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            token,
            slot: Mutex::new(ConnectionSlot::default()),
            script: redis::Script::new(CONSUME_SCRIPT),
        }
    }

    pub fn counter_key(key: &str, window: &str) -> String {
        format!("quota:{}:{}", window, key)
    }

    async fn redis(&self) -> Result<RedisService> {
        let mut slot = self.slot.lock().await;
        if let Some(redis) = &slot.redis {
            return Ok(redis.clone());
        }

        if let Some(last_attempt) = slot.last_attempt {
            if last_attempt.elapsed() < RECONNECT_BACKOFF {
                return Err(GatewayError::QuotaStore(RedisError::from((
                    ErrorKind::IoError,
                    "Redis not connected; waiting before the next attempt",
                ))));
            }
        }

        // Stamped before connecting so a cancelled attempt still backs off.
        slot.last_attempt = Some(Instant::now());
        let redis = RedisService::new(&self.redis_url, self.token.as_deref()).await?;
        tracing::info!("Quota store connected to Redis");
        slot.redis = Some(redis.clone());
        Ok(redis)
    }
}

#[async_trait]
impl QuotaStore for RedisQuotaStore {
    async fn consume(&self, key: &str, window: &str, limit: u32, ttl: Duration) -> Result<ConsumeOutcome> {
        let mut conn = self.redis().await?.connection_manager().clone();

        let result: Vec<i64> = self
            .script
            .key(Self::counter_key(key, window))
            .arg(limit)
            .arg(ttl.as_secs().max(1))
            .invoke_async(&mut conn)
            .await?;

        let allowed = result.first().copied().unwrap_or(0) == 1;
        let count = result.get(1).copied().unwrap_or(0).clamp(0, u32::MAX as i64) as u32;

        Ok(ConsumeOutcome { allowed, count })
    }

    async fn ping(&self) -> Result<()> {
        self.redis().await?.ping().await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::AsyncCommands;
    use std::sync::Arc;
    use uuid::Uuid;

    const DAY: Duration = Duration::from_secs(86_400);

    #[test]
    fn test_counter_key_layout() {
        assert_eq!(
            RedisQuotaStore::counter_key("ab12", "2026-05-01"),
            "quota:2026-05-01:ab12"
        );
    }

    #[tokio::test]
    async fn test_unreachable_redis_backs_off_between_attempts() {
        let store = RedisQuotaStore::new("redis://127.0.0.1:1", None);
        assert_eq!(store.backend(), "redis");

        let first = tokio::time::timeout(Duration::from_millis(500), store.ping()).await;
        assert!(!matches!(first, Ok(Ok(()))));

        // Inside the backoff window the store fails fast instead of dialing again.
        let second = tokio::time::timeout(Duration::from_millis(100), store.ping())
            .await
            .expect("store should not dial during backoff");
        assert!(matches!(second, Err(GatewayError::QuotaStore(_))));

        let consume = tokio::time::timeout(
            Duration::from_millis(100),
            store.consume("k", "2026-05-01", 3, DAY),
        )
        .await
        .expect("store should not dial during backoff");
        assert!(consume.is_err());
    }

    // The tests below run the Lua script against a real server:
    // REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored

    fn live_redis_url() -> Option<String> {
        std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty())
    }

    fn unique_key() -> String {
        format!("test-{}", Uuid::new_v4())
    }

    #[tokio::test]
    #[ignore]
    async fn test_script_counts_up_to_limit_then_refuses() {
        let Some(url) = live_redis_url() else { return };
        let store = RedisQuotaStore::new(url, None);
        let key = unique_key();

        for expected in 1..=3 {
            let outcome = store.consume(&key, "2026-05-01", 3, DAY).await.unwrap();
            assert_eq!(outcome, ConsumeOutcome { allowed: true, count: expected });
        }

        for _ in 0..2 {
            let outcome = store.consume(&key, "2026-05-01", 3, DAY).await.unwrap();
            assert_eq!(outcome, ConsumeOutcome { allowed: false, count: 3 });
        }

        let other = store.consume(&key, "2026-05-02", 3, DAY).await.unwrap();
        assert_eq!(other, ConsumeOutcome { allowed: true, count: 1 });
    }

    #[tokio::test]
    #[ignore]
    async fn test_script_sets_expiry_on_first_increment() {
        let Some(url) = live_redis_url() else { return };
        let store = RedisQuotaStore::new(url.clone(), None);
        let key = unique_key();
        let counter = RedisQuotaStore::counter_key(&key, "2026-05-01");

        store.consume(&key, "2026-05-01", 3, Duration::from_secs(120)).await.unwrap();

        let mut conn = redis::Client::open(url.as_str())
            .unwrap()
            .get_multiplexed_async_connection()
            .await
            .unwrap();
        let ttl: i64 = conn.ttl(&counter).await.unwrap();
        assert!(ttl > 0 && ttl <= 120, "ttl was {ttl}");

        // Later increments leave the expiry alone.
        let _: () = conn.expire(&counter, 30).await.unwrap();
        store.consume(&key, "2026-05-01", 3, Duration::from_secs(120)).await.unwrap();
        let ttl: i64 = conn.ttl(&counter).await.unwrap();
        assert!(ttl > 0 && ttl <= 30, "ttl was {ttl}");
    }

    #[tokio::test]
    #[ignore]
    async fn test_script_concurrent_consumers_never_exceed_limit() {
        let Some(url) = live_redis_url() else { return };
        let store = Arc::new(RedisQuotaStore::new(url, None));
        let key = unique_key();

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let store = store.clone();
                let key = key.clone();
                tokio::spawn(async move { store.consume(&key, "2026-05-01", 3, DAY).await.unwrap() })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            let outcome = handle.await.unwrap();
            assert!(outcome.count <= 3);
            if outcome.allowed {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 3);
    }
}
