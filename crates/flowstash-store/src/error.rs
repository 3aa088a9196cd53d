// ABOUTME: Error type for store operations that are allowed to fail.
// ABOUTME: Artifact loads never fail; writes and library reads surface these errors.

use std::path::PathBuf;

use flowstash_core::CodecError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("invalid library path: {0}")]
    InvalidPath(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
