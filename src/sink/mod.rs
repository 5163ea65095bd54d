//! Sink subsystem: where accepted submissions are written.
//!
//! # Data Flow
//! ```text
//! SheetRow
//!     → SubmissionSink::append
//!         → sheets.rs (service account JWT → access token → values:append)
//!         → log.rs (tracing only, local development)
//!         → memory.rs (tests)
//! ```
//!
//! # Design Decisions
//! - One append per accepted submission, no retries
//! - Failure detail stays server-side; callers only learn that the append failed

pub mod log;
pub mod memory;
pub mod sheets;

use async_trait::async_trait;

use crate::submission::SheetRow;

pub use log::LogSink;
pub use memory::MemorySink;
pub use sheets::{ServiceAccountKey, SheetsSink};

/// Errors that can occur while appending a row.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Service account credentials missing or unusable.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Sink settings cannot be turned into a request.
    #[error("Invalid sink configuration: {0}")]
    Config(String),

    /// Building the signed token assertion failed.
    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint refused the assertion.
    #[error("Token exchange failed: {0}")]
    Token(String),

    /// Transport-level failure (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The append endpoint answered with a non-success status.
    #[error("Sink returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The sink refused the write for its own reasons.
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only destination for accepted submissions.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Append one row. Either the whole row is written or an error is returned.
    async fn append(&self, row: SheetRow) -> Result<(), SinkError>;
}
