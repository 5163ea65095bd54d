//! Submission intake: the payload, its validation rules, and the sheet row it becomes.
//!
//! # Data Flow
//! ```text
//! request body (bytes)
//!     → payload.rs (JSON object → SubmissionPayload)
//!     → validate() (rules in order, first failure wins)
//!     → ValidSubmission (resolved name/genre, trimmed description)
//!     → SheetRow (timestamp + four ordered fields) → sink
//! ```

pub mod genre;
pub mod payload;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::to_iso8601;

pub use genre::Genre;
pub use payload::{Field, SubmissionPayload};

/// Longest accepted description, in characters after trimming.
pub const MAX_DESCRIPTION: usize = 280;
/// Longest accepted name, in characters after trimming.
pub const MAX_NAME: usize = 100;
/// Longest accepted free-text genre, in characters after trimming.
pub const MAX_OTHER_GENRE: usize = 100;
/// Name recorded when the submitter leaves it blank.
pub const ANONYMOUS: &str = "Anonymous";

/// Why a submission was refused. The display text is sent to the client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid request body.")]
    MalformedBody,
    #[error("Description must be 1–{max} characters.", max = MAX_DESCRIPTION)]
    Description,
    #[error("Invalid genre selection.")]
    Genre,
    #[error("Please specify a genre (1–{max} characters).", max = MAX_OTHER_GENRE)]
    OtherGenre,
    #[error("Name must be at most {max} characters.", max = MAX_NAME)]
    Name,
}

impl ValidationError {
    /// Short label for logs and metrics.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MalformedBody => "body",
            ValidationError::Description => "description",
            ValidationError::Genre => "genre",
            ValidationError::OtherGenre => "otherGenre",
            ValidationError::Name => "name",
        }
    }
}

/// A submission that passed every rule, with its fields resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Trimmed name, or [`ANONYMOUS`].
    pub name: String,
    /// The genre picked from the list.
    pub genre: Genre,
    /// The genre written to the sheet: the label, or the trimmed free text for `Other`.
    pub resolved_genre: String,
    /// Trimmed description.
    pub description: String,
}

impl ValidSubmission {
    /// Build the row appended to the sheet.
    pub fn into_row(self, at: DateTime<Utc>) -> SheetRow {
        SheetRow {
            timestamp: to_iso8601(at),
            name: self.name,
            genre: self.resolved_genre,
            description: self.description,
        }
    }
}

/// One appended row: `(timestamp, name, genre, description)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub timestamp: String,
    pub name: String,
    pub genre: String,
    pub description: String,
}

impl SheetRow {
    /// Cells in column order.
    pub fn into_values(self) -> [String; 4] {
        [self.timestamp, self.name, self.genre, self.description]
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Strip the whitespace a browser's `String.prototype.trim` strips.
///
/// Unlike `str::trim` this removes U+FEFF and keeps U+0085.
fn trim_form_text(text: &str) -> &str {
    text.trim_matches(|c: char| (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}')
}

/// Trimmed text if `field` is a string whose trimmed length is within `range`.
fn bounded_text(field: &Field, range: std::ops::RangeInclusive<usize>) -> Option<&str> {
    let trimmed = trim_form_text(field.as_text()?);
    range.contains(&char_len(trimmed)).then_some(trimmed)
}

impl SubmissionPayload {
    /// Apply the intake rules in order. The first failing rule is returned.
    pub fn validate(&self) -> Result<ValidSubmission, ValidationError> {
        let description =
            bounded_text(&self.description, 1..=MAX_DESCRIPTION).ok_or(ValidationError::Description)?;

        let genre: Genre = self
            .genre
            .as_text()
            .and_then(|label| label.parse().ok())
            .ok_or(ValidationError::Genre)?;

        let resolved_genre = if genre == Genre::Other {
            bounded_text(&self.other_genre, 1..=MAX_OTHER_GENRE)
                .ok_or(ValidationError::OtherGenre)?
                .to_string()
        } else {
            genre.as_str().to_string()
        };

        let name = if self.name.is_provided() {
            bounded_text(&self.name, 0..=MAX_NAME).ok_or(ValidationError::Name)?
        } else {
            ""
        };
        let name = if name.is_empty() { ANONYMOUS } else { name };

        Ok(ValidSubmission {
            name: name.to_string(),
            genre,
            resolved_genre,
            description: description.to_string(),
        })
    }
}

/// Parse and validate a raw request body.
pub fn validate_body(body: &[u8]) -> Result<ValidSubmission, ValidationError> {
    SubmissionPayload::from_json(body)?.validate()
}
