//! Error types for the cyclone-dat workspace.

use thiserror::Error;

/// Result type alias using TransformError.
pub type TransformResult<T> = Result<T, TransformError>;

/// Primary error type for bulletin transform operations.
#[derive(Debug, Error)]
pub enum TransformError {
    // === Feature-scoped errors (drop the feature, keep the record) ===
    #[error("Malformed storm identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Invalid timestamp: {0}")]
    TimeParse(String),

    #[error("Missing required metadata: {0}")]
    MissingMetadata(String),

    #[error("Unrecognized bearing range: {0}")]
    UnknownQuadrant(String),

    // === Batch-fatal errors ===
    #[error("Unrecognized feature name: {0}")]
    Classification(String),

    #[error("Value '{value}' does not fit field '{field}' of width {width}")]
    FieldOverflow {
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("Failed to decode bulletin input: {0}")]
    Decode(String),

    #[error("Failed to publish artifact: {0}")]
    Publish(String),
}

impl TransformError {
    /// Whether this error poisons only the offending feature.
    ///
    /// Feature-scoped errors are logged and the feature dropped; the
    /// owning record continues with whichever fields it already has.
    /// Everything else aborts the invocation.
    pub fn is_feature_scoped(&self) -> bool {
        matches!(
            self,
            TransformError::MalformedIdentifier(_)
                | TransformError::TimeParse(_)
                | TransformError::MissingMetadata(_)
                | TransformError::UnknownQuadrant(_)
        )
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Decode(format!("JSON error: {}", err))
    }
}
