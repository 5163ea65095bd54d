//! In-memory sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::sink::{SinkError, SubmissionSink};
use crate::submission::SheetRow;

/// Keeps appended rows in memory. Can be told to fail every append.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Mutex<Vec<SheetRow>>,
    failing: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses every append.
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.set_failing(true);
        sink
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Rows appended so far, oldest first.
    pub fn rows(&self) -> Vec<SheetRow> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn append(&self, row: SheetRow) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("memory sink set to fail".into()));
        }
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
        Ok(())
    }
}
