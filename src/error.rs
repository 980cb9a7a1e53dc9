//! Error type for the prediction pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    /// No dataset file yet. Callers recover by generating one.
    #[error("dataset file not found: {}", path.display())]
    MissingDatasetFile { path: PathBuf },

    /// A model artifact is absent. Callers recover by retraining.
    #[error("model artifact not found: {}", path.display())]
    MissingModelArtifact { path: PathBuf },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {context}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: bincode::Error,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("training failed: {message}")]
    Training { message: String },
}

pub type PredictResult<T> = Result<T, PredictError>;

impl PredictError {
    pub fn missing_dataset(path: &Path) -> Self {
        Self::MissingDatasetFile {
            path: path.to_path_buf(),
        }
    }

    pub fn missing_artifact(path: &Path) -> Self {
        Self::MissingModelArtifact {
            path: path.to_path_buf(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    pub fn serialization(context: impl Into<String>, source: bincode::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::Training {
            message: message.into(),
        }
    }

    /// True for the two variants a caller can recover from by rebuilding.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MissingDatasetFile { .. } | Self::MissingModelArtifact { .. }
        )
    }
}

impl From<figment::Error> for PredictError {
    fn from(err: figment::Error) -> Self {
        Self::config(err.to_string())
    }
}
