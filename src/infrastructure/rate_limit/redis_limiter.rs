//! Redis-backed fixed-window rate limiter.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use std::time::Duration;
use tracing::{info, warn};

use super::service::{RateDecision, RateLimiter};

/// Checks the counter, increments it only when below the limit, and starts the
/// window expiry on the first hit. Returns `{admitted, count, pttl_ms}`.
const ADMIT_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
local limit = tonumber(ARGV[1])
if current >= limit then
    return {0, current, redis.call('PTTL', KEYS[1])}
end
current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[2])
end
return {1, current, redis.call('PTTL', KEYS[1])}
"#;

/// Errors raised while setting up the Redis limiter.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitBackendError {
    #[error("Rate limit backend connection error: {0}")]
    Connection(String),
}

/// Fixed-window limiter whose counters live in Redis.
///
/// The Lua script runs atomically on the server, so every replica of the
/// service shares one counter per client. On Redis errors the limiter fails
/// open and admits the request.
pub struct RedisRateLimiter {
    client: ConnectionManager,
    script: Script,
    limit: u32,
    window: Duration,
    key_prefix: String,
}

impl RedisRateLimiter {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitBackendError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(
        redis_url: &str,
        limit: u32,
        window: Duration,
    ) -> Result<Self, RateLimitBackendError> {
        info!("Connecting rate limiter to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            RateLimitBackendError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RateLimitBackendError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| RateLimitBackendError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Rate limiter connected to Redis");

        Ok(Self {
            client: manager,
            script: Script::new(ADMIT_SCRIPT),
            limit,
            window,
            key_prefix: "ratelimit:".to_string(),
        })
    }

    fn build_key(&self, client_id: &str) -> String {
        format!("{}{}", self.key_prefix, client_id)
    }

    fn window_millis(&self) -> u64 {
        self.window.as_millis().max(1) as u64
    }
}

/// Maps an `{admitted, count, pttl_ms}` script reply to a decision.
///
/// A missing or expired TTL on a limited key falls back to the full window.
fn decision_from_reply(limit: u32, window: Duration, reply: &[i64]) -> Option<RateDecision> {
    match *reply {
        [1, count, _] => Some(RateDecision::Admitted {
            remaining: limit.saturating_sub(count.clamp(0, u32::MAX as i64) as u32),
        }),
        [0, _, pttl] => {
            let retry_after = if pttl > 0 {
                Duration::from_millis(pttl as u64)
            } else {
                window
            };
            Some(RateDecision::Limited { retry_after })
        }
        _ => None,
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn admit(&self, client_id: &str) -> RateDecision {
        let key = self.build_key(client_id);
        let mut conn = self.client.clone();

        let result: redis::RedisResult<Vec<i64>> = self
            .script
            .key(&key)
            .arg(self.limit)
            .arg(self.window_millis())
            .invoke_async(&mut conn)
            .await;

        match result {
            Ok(reply) => decision_from_reply(self.limit, self.window, &reply).unwrap_or_else(|| {
                warn!("Unexpected rate limit script reply {:?}, admitting", reply);
                RateDecision::Admitted {
                    remaining: self.limit,
                }
            }),
            Err(e) => {
                warn!("Redis rate limit error for {}: {}, admitting", client_id, e);
                RateDecision::Admitted {
                    remaining: self.limit,
                }
            }
        }
    }

    fn limit(&self) -> u32 {
        self.limit
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_admitted_reply() {
        assert_eq!(
            decision_from_reply(20, WINDOW, &[1, 1, 60_000]),
            Some(RateDecision::Admitted { remaining: 19 })
        );
        assert_eq!(
            decision_from_reply(20, WINDOW, &[1, 20, 1_500]),
            Some(RateDecision::Admitted { remaining: 0 })
        );
    }

    #[test]
    fn test_limited_reply_uses_key_ttl() {
        let decision = decision_from_reply(20, WINDOW, &[0, 20, 1_500]).unwrap();

        assert_eq!(
            decision,
            RateDecision::Limited {
                retry_after: Duration::from_millis(1_500)
            }
        );
        assert_eq!(decision.retry_after_secs(), 2);
    }

    #[test]
    fn test_limited_reply_without_ttl_uses_window() {
        // PTTL is -1 for keys without expiry and -2 for missing keys
        for pttl in [-1, -2, 0] {
            assert_eq!(
                decision_from_reply(20, WINDOW, &[0, 20, pttl]),
                Some(RateDecision::Limited {
                    retry_after: WINDOW
                })
            );
        }
    }

    #[test]
    fn test_malformed_reply() {
        assert_eq!(decision_from_reply(20, WINDOW, &[]), None);
        assert_eq!(decision_from_reply(20, WINDOW, &[1, 2]), None);
        assert_eq!(decision_from_reply(20, WINDOW, &[2, 1, 100]), None);
    }
}
