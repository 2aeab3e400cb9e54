//! Error types for seriesdoc core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building documents.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field value cannot be stored as a number or a string.
    #[error("cannot convert {value} to a number (series {series}, field {field})")]
    NotNumeric {
        /// Series the value belongs to.
        series: String,
        /// Field or tag name.
        field: String,
        /// Debug rendering of the offending value.
        value: String,
    },

    /// A point carries fields but no aggregation period.
    #[error("point of series {series} has fields but no period")]
    MissingPeriod {
        /// Series name.
        series: String,
    },

    /// A key field named for identity is absent from the document.
    #[error("key field {field} missing from document of type {doc_type}")]
    MissingKeyField {
        /// The missing field name.
        field: String,
        /// The document's `type` attribute, if any.
        doc_type: String,
    },

    /// The merge label was empty.
    #[error("merge label must not be empty")]
    EmptyMergeLabel,

    /// A timestamp string did not match the document date format.
    #[error("invalid timestamp {input:?}: {message}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Parser message.
        message: String,
    },

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true for errors caused by the input data rather than the caller's setup.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            CoreError::NotNumeric { .. }
                | CoreError::MissingPeriod { .. }
                | CoreError::InvalidTimestamp { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::NotNumeric {
            series: "commits".into(),
            field: "ok".into(),
            value: "Boolean(true)".into(),
        };
        let text = err.to_string();
        assert!(text.contains("commits"));
        assert!(text.contains("Boolean(true)"));

        assert_eq!(
            CoreError::EmptyMergeLabel.to_string(),
            "merge label must not be empty"
        );
    }

    #[test]
    fn data_errors() {
        assert!(CoreError::MissingPeriod {
            series: "s".into()
        }
        .is_data_error());
        assert!(!CoreError::EmptyMergeLabel.is_data_error());
    }
}
