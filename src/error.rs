use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by a [`DocumentStore`](crate::DocumentStore).
///
/// Records never translate these; they propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("storage io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed document store at {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
