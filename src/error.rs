//! Error types for the LUXE valuation crate

use thiserror::Error;

/// Result type alias for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Main error type for training, inference and statistics
#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Invalid input: {field} = {value:?}, {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ValuationError {
    /// Build an [`ValuationError::InvalidInput`] for a form or CLI field
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValuationError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for ValuationError {
    fn from(err: polars::error::PolarsError) -> Self {
        ValuationError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ValuationError {
    fn from(err: serde_json::Error) -> Self {
        ValuationError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for ValuationError {
    fn from(err: bincode::Error) -> Self {
        ValuationError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ValuationError {
    fn from(err: ndarray::ShapeError) -> Self {
        ValuationError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
