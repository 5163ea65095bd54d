//! Sliding-window rate limiting per client.
//!
//! Each client identifier maps to the epoch-millisecond timestamps of its
//! recent admissions. A check prunes timestamps older than the window, then
//! admits only if fewer than `limit` remain. Rejections never record a
//! timestamp, so a client hammering the endpoint does not extend its own ban.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::clock::Clock;
use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics::{self, Outcome};
use crate::security::client_id::client_id;

/// In-memory sliding-window limiter. State is per process and lost on restart.
pub struct SlidingWindowLimiter {
    entries: DashMap<String, Vec<i64>>,
    clock: Arc<dyn Clock>,
    limit: usize,
    window_ms: i64,
}

impl SlidingWindowLimiter {
    pub fn new(limit: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            limit,
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config.max_submissions,
            Duration::from_secs(config.window_secs),
            clock,
        )
    }

    /// Admit or reject one attempt from `client`, recording it if admitted.
    ///
    /// Prune, count and record happen under the entry's shard lock, so two
    /// concurrent requests from one client cannot both take the last slot.
    pub fn check_and_record(&self, client: &str) -> bool {
        let now = self.clock.now_millis();
        let mut timestamps = self.entries.entry(client.to_string()).or_default();
        timestamps.retain(|&at| now - at < self.window_ms);

        if timestamps.len() >= self.limit {
            return false;
        }
        timestamps.push(now);
        true
    }

    /// Timestamps currently stored for `client` (not pruned).
    pub fn recent(&self, client: &str) -> usize {
        self.entries.get(client).map_or(0, |timestamps| timestamps.len())
    }

    /// Number of client identifiers held in memory.
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }

    /// Drop clients with no admissions inside the window. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let before = self.entries.len();
        self.entries.retain(|_, timestamps| {
            timestamps.retain(|&at| now - at < self.window_ms);
            !timestamps.is_empty()
        });
        before.saturating_sub(self.entries.len())
    }
}

/// Gate for the submit route. Runs before the body is read.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<SlidingWindowLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_id(request.headers());

    if limiter.check_and_record(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        metrics::record_submission(Outcome::RateLimited);
        ApiError::RateLimited.into_response()
    }
}

/// Periodically sweep idle clients until shutdown.
pub async fn run_sweeper(
    limiter: Arc<SlidingWindowLimiter>,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = limiter.sweep();
                let remaining = limiter.tracked_clients();
                metrics::record_tracked_clients(remaining);
                tracing::debug!(removed, remaining, "Rate limiter swept");
            }
            _ = shutdown.recv() => {
                tracing::debug!("Rate limiter sweeper stopping");
                break;
            }
        }
    }
}
