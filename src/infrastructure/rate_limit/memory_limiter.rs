//! In-process fixed-window rate limiter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::service::{RateDecision, RateLimiter};

/// Per-client counter for the current window.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    window_start: Instant,
}

/// Fixed-window limiter with counters held in a mutex-guarded map.
///
/// Windows start at a client's first request and restart once `window` has
/// elapsed. Idle entries are removed by [`MemoryRateLimiter::purge_expired`],
/// usually driven by [`MemoryRateLimiter::spawn_sweeper`].
pub struct MemoryRateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl MemoryRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admission check against an explicit clock reading.
    pub fn admit_at(&self, client_id: &str, now: Instant) -> RateDecision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Rate limiter lock poisoned, recovering");
                poisoned.into_inner()
            }
        };

        let entry = windows
            .entry(client_id.to_string())
            .or_insert(RateWindow {
                count: 0,
                window_start: now,
            });

        let mut elapsed = now.saturating_duration_since(entry.window_start);
        if elapsed >= self.window {
            entry.count = 0;
            entry.window_start = now;
            elapsed = Duration::ZERO;
        }

        if entry.count < self.limit {
            entry.count += 1;
            RateDecision::Admitted {
                remaining: self.limit - entry.count,
            }
        } else {
            RateDecision::Limited {
                retry_after: self.window - elapsed,
            }
        }
    }

    /// Drops windows that have fully elapsed at `now`. Returns how many.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.window_start) < self.window);
        before - windows.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }

    /// Spawns a task that purges expired windows every `every`.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.purge_expired();
                if removed > 0 {
                    debug!(removed, "Purged expired rate windows");
                }
            }
        })
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn admit(&self, client_id: &str) -> RateDecision {
        self.admit_at(client_id, Instant::now())
    }

    fn limit(&self) -> u32 {
        self.limit
    }

    async fn health_check(&self) -> bool {
        true
    }
}
