//! Error types for medtrack-store

use medtrack_core::GatewayError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid store document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(e) => GatewayError::Unavailable {
                message: e.to_string(),
            },
            StoreError::InvalidDocument(e) => GatewayError::Malformed {
                message: e.to_string(),
            },
        }
    }
}
