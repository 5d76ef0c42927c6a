//! Data model error types

use thiserror::Error;

/// Errors raised while decoding or validating entries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    /// Entry JSON was not an object
    #[error("Entry must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A required field is missing or null
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Date string did not parse as YYYY-MM-DD
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Range start is after range end
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: String, end: String },
}

/// Result type alias for model operations
pub type EntryResult<T> = Result<T, EntryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EntryError::MissingField("date");
        assert_eq!(err.to_string(), "Missing field: date");

        let err = EntryError::InvalidRange {
            start: "2024-02-01".to_string(),
            end: "2024-01-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: 2024-02-01 is after 2024-01-01"
        );
    }
}
