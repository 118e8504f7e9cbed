use thiserror::Error;

/// Failures surfaced by the materials tree, its store and the upload sandbox.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("node not found: {0}")]
    NotFound(String),

    #[error("invalid parent: {0}")]
    InvalidParent(String),

    #[error("{0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("cannot move {id} into its own subtree (target {target})")]
    Cycle { id: String, target: String },

    #[error("file exceeds the upload limit of {limit} bytes")]
    UploadTooLarge { limit: u64 },

    #[error("file type not allowed: {0}")]
    UnsupportedMediaType(String),

    #[error("path outside the upload directory: {0}")]
    PathTraversal(String),

    #[error("corrupt materials document: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
