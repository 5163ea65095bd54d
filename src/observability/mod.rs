//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, rate limiter, sink:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every submission log line
//! - Submitted text stays out of handler logs
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
