//! Messages accepted by the store worker.
//!
//! Each message owns a one-shot reply sender; the worker answers it exactly
//! once and the originating task consumes the answer exactly once.

use goto_core::{Key, StorageError};
use tokio::sync::oneshot;

pub type LookupReply = Result<Option<String>, StorageError>;
pub type SaveReply = Result<(), StorageError>;

/// Resolve `key` to its URL.
#[derive(Debug)]
pub struct LookupRequest {
    pub key: Key,
    pub reply: oneshot::Sender<LookupReply>,
}

/// Store `url` under `key`, replacing any previous mapping.
#[derive(Debug)]
pub struct SaveRequest {
    pub key: Key,
    pub url: String,
    pub reply: oneshot::Sender<SaveReply>,
}
