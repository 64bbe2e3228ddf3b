use std::time::Duration;
use thiserror::Error;

/// Result type for redirect store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("failed to open storage: {0}")]
    Open(String),
    #[error("failed to ensure schema: {0}")]
    Schema(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Errors surfaced to callers of a [`Redirector`](crate::Redirector).
#[derive(Debug, Clone, Error)]
pub enum RedirectError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("no reply from store worker within {0:?}")]
    Timeout(Duration),
    #[error("store worker is not running")]
    Unavailable,
}
