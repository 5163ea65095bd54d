//! Typed view of the raw request body.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::submission::ValidationError;

/// A single JSON field as the validator needs to see it.
///
/// Keeps "missing", "null" and "wrong type" apart so each rule can report its
/// own message instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Absent,
    Null,
    Text(String),
    NotText,
}

impl Field {
    /// The string value, if the field holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Present with a non-null value.
    pub fn is_provided(&self) -> bool {
        !matches!(self, Field::Absent | Field::Null)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Field::Null,
            Value::String(text) => Field::Text(text),
            _ => Field::NotText,
        })
    }
}

/// The submission body as posted by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default)]
    pub description: Field,
    #[serde(default)]
    pub genre: Field,
    #[serde(default)]
    pub other_genre: Field,
    #[serde(default)]
    pub name: Field,
}

impl SubmissionPayload {
    /// Parse a request body. Anything other than a JSON object is rejected.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(object @ Value::Object(_)) => {
                serde_json::from_value(object).map_err(|_| ValidationError::MalformedBody)
            }
            _ => Err(ValidationError::MalformedBody),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_absent_null_and_wrong_type() {
        let payload = SubmissionPayload::from_json(
            br#"{"description": "A quiet nocturne", "genre": 7, "name": null}"#,
        )
        .unwrap();

        assert_eq!(payload.description, Field::Text("A quiet nocturne".into()));
        assert_eq!(payload.genre, Field::NotText);
        assert_eq!(payload.other_genre, Field::Absent);
        assert_eq!(payload.name, Field::Null);
    }

    #[test]
    fn reads_camel_case_other_genre() {
        let payload =
            SubmissionPayload::from_json(br#"{"genre": "Other", "otherGenre": "Tango"}"#).unwrap();
        assert_eq!(payload.other_genre.as_text(), Some("Tango"));
    }

    #[test]
    fn rejects_non_objects() {
        let bodies: [&[u8]; 6] = [b"not json", b"", b"null", b"[]", b"\"text\"", b"42"];
        for body in bodies {
            assert_eq!(
                SubmissionPayload::from_json(body),
                Err(ValidationError::MalformedBody),
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn ignores_unknown_fields() {
        let payload =
            SubmissionPayload::from_json(br#"{"description": "x", "extra": {"a": 1}}"#).unwrap();
        assert_eq!(payload.description.as_text(), Some("x"));
    }
}
