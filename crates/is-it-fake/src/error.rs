use std::path::PathBuf;

use is_it_fake_preprocessing::FeatureError;

/// Errors surfaced by the detector.
///
/// [`DetectorError::InvalidInput`] maps to a client error, everything else to a
/// server error (see [`DetectorError::is_client_error`]).
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("artifact {}: {reason}", path.display())]
    Artifact { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DetectorError {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Artifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<FeatureError> for DetectorError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::NotFitted => Self::ModelUnavailable("model not loaded".to_string()),
            other => Self::ModelUnavailable(other.to_string()),
        }
    }
}

pub type Result<T, E = DetectorError> = std::result::Result<T, E>;
