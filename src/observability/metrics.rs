//! Metrics collection and exposition.
//!
//! # Metrics
//! - `intake_submissions_total` (counter): submissions by `outcome`
//! - `intake_sink_append_seconds` (histogram): sink append latency
//! - `intake_rate_limiter_clients` (gauge): client identifiers held in memory

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a submission request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Invalid,
    RateLimited,
    SinkError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Invalid => "invalid",
            Outcome::RateLimited => "rate_limited",
            Outcome::SinkError => "sink_error",
        }
    }
}

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_submission(outcome: Outcome) {
    metrics::counter!("intake_submissions_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_sink_append(started: Instant) {
    metrics::histogram!("intake_sink_append_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_tracked_clients(count: usize) {
    metrics::gauge!("intake_rate_limiter_clients").set(count as f64);
}
