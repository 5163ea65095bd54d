//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/submit:
//!     → client_id.rs (X-Forwarded-For / X-Real-IP / "unknown")
//!     → rate_limit.rs (sliding window per client)
//!     → handler
//!
//! Every response:
//!     → headers.rs (nosniff, frame denial, referrer policy)
//! ```
//!
//! # Design Decisions
//! - Rate limiting happens before the body is read
//! - Proxy headers are trusted as-is; clients without them share one bucket
//! - Limiter state is process-local

pub mod client_id;
pub mod headers;
pub mod rate_limit;

pub use client_id::{client_id, UNKNOWN_CLIENT};
pub use rate_limit::{rate_limit_middleware, run_sweeper, SlidingWindowLimiter};
