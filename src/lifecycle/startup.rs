//! Startup wiring: turn configuration and environment into a ready sink.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::{IntakeConfig, SinkKind};
use crate::sink::sheets::SHEET_ID_ENV;
use crate::sink::{LogSink, ServiceAccountKey, SheetsSink, SinkError, SubmissionSink};

/// Errors that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("No spreadsheet configured: set {} or sink.spreadsheet_id", SHEET_ID_ENV)]
    MissingSpreadsheetId,

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// The spreadsheet to write to. The environment overrides the config file.
pub fn resolve_spreadsheet_id(
    config: &IntakeConfig,
    from_env: Option<String>,
) -> Result<String, StartupError> {
    from_env
        .or_else(|| config.sink.spreadsheet_id.clone())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(StartupError::MissingSpreadsheetId)
}

/// Build the configured sink, reading credentials from the environment.
pub fn build_sink(
    config: &IntakeConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn SubmissionSink>, StartupError> {
    match config.sink.kind {
        SinkKind::Log => {
            tracing::warn!("Using log sink: submissions will not be persisted");
            Ok(Arc::new(LogSink))
        }
        SinkKind::Sheets => {
            let spreadsheet_id = resolve_spreadsheet_id(config, std::env::var(SHEET_ID_ENV).ok())?;
            let key = ServiceAccountKey::from_env()?;
            let client_email = key.client_email.clone();
            let sink = SheetsSink::new(
                &config.sink,
                &spreadsheet_id,
                key,
                Duration::from_secs(config.timeouts.sink_secs),
                clock,
            )?;
            tracing::info!(
                client_email = %client_email,
                range = %config.sink.range,
                "Sheets sink ready"
            );
            Ok(Arc::new(sink))
        }
    }
}
