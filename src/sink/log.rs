//! A sink that only logs rows.

use async_trait::async_trait;

use crate::sink::{SinkError, SubmissionSink};
use crate::submission::SheetRow;

/// Writes each row to the log. Useful when running without sheet credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl SubmissionSink for LogSink {
    async fn append(&self, row: SheetRow) -> Result<(), SinkError> {
        tracing::info!(
            timestamp = %row.timestamp,
            name = %row.name,
            genre = %row.genre,
            description = %row.description,
            "Submission row"
        );
        Ok(())
    }
}
