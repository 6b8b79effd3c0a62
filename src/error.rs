//! Error types with actionable diagnostics.
//!
//! All errors include enough context to resolve the issue without digging
//! through the call site.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reconstruir operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data, training, or persisting state.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error while reading a dataset file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A dataset file had unexpected contents.
    #[error("Dataset error: {message}\n  → Check that the file is a label,pixel0..pixel783 CSV export")]
    Dataset { message: String },

    /// A parameter snapshot did not match the expected layout.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}\n  → Check that the checkpoint matches the model architecture")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The validation provider yielded no batches, so the average
    /// validation loss is undefined.
    #[error("validation provider yielded no batches\n  → Check that the validation dataset contains at least one sample")]
    EmptyValidationSet,

    /// A required CLI argument was missing.
    #[error("Missing argument: {message}")]
    MissingArgument { message: String },
}

impl Error {
    /// Wrap an IO error with a description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Build a serialization error from any displayable cause.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
