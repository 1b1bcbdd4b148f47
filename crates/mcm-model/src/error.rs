//! Error types for the music collection model.

use thiserror::Error;

use crate::schema::{DataType, FieldKey};

/// Errors raised while building schemas, parsing sort rules, or assigning
/// field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field appears more than once in a schema.
    #[error("field '{0}' appears more than once in the schema")]
    DuplicateField(FieldKey),

    /// A schema does not cover every song field.
    #[error("schema is missing field '{0}'")]
    MissingField(FieldKey),

    /// Two descriptors share a CSV header name.
    #[error("CSV header '{0}' is used by more than one field")]
    DuplicateHeader(String),

    /// Name does not match any known field.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Sort direction text is not recognised.
    #[error("invalid sort direction '{0}' (expected asc or desc)")]
    InvalidSortDirection(String),

    /// Value type does not match the field's declared type.
    #[error("field '{field}' expects a {expected} value")]
    TypeMismatch { field: FieldKey, expected: DataType },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::UnknownField("genre".to_string());
        assert_eq!(err.to_string(), "unknown field 'genre'");

        let err = ModelError::TypeMismatch {
            field: FieldKey::TrackNumber,
            expected: DataType::Number,
        };
        assert_eq!(err.to_string(), "field 'track_number' expects a number value");
    }
}
