//! Error types for training, persistence and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the model crate
pub type Result<T, E = MoodError> = std::result::Result<T, E>;

/// Coarse classification of a [`MoodError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request lacks a name from the artifact's feature list
    MissingFeature,
    /// A value cannot be read as the expected boolean/numeric type
    TypeCoercion,
    /// The classifier call itself failed
    ModelInvocation,
    /// The artifact could not be read or is inconsistent
    ArtifactLoad,
    /// The training data file does not exist
    DatasetNotFound,
    /// The training data is malformed
    Dataset,
    /// Fitting the classifier failed
    Training,
    /// The artifact could not be written
    Save,
}

impl ErrorKind {
    /// Whether the error was caused by the request contents.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::MissingFeature | ErrorKind::TypeCoercion | ErrorKind::ModelInvocation
        )
    }
}

#[derive(Error, Debug)]
pub enum MoodError {
    #[error("Missing required feature: '{0}'")]
    MissingFeature(String),

    #[error("Invalid value for '{feature}': {reason}")]
    TypeCoercion { feature: String, reason: String },

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Failed to load model artifact: {0}")]
    ArtifactLoad(String),

    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Failed to save model artifact: {0}")]
    Save(String),
}

impl MoodError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoodError::MissingFeature(_) => ErrorKind::MissingFeature,
            MoodError::TypeCoercion { .. } => ErrorKind::TypeCoercion,
            MoodError::ModelInvocation(_) => ErrorKind::ModelInvocation,
            MoodError::ArtifactLoad(_) => ErrorKind::ArtifactLoad,
            MoodError::DatasetNotFound(_) => ErrorKind::DatasetNotFound,
            MoodError::Dataset(_) => ErrorKind::Dataset,
            MoodError::Training(_) => ErrorKind::Training,
            MoodError::Save(_) => ErrorKind::Save,
        }
    }

    pub(crate) fn coercion(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        MoodError::TypeCoercion {
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}
