//! Error types for the sync layer.

use thiserror::Error;

/// Main error type for sync operations.
///
/// Most operations in this crate never fail under normal use. Unknown
/// collections and late ready signals are dropped, not reported.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Collection already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Handler already registered as: {0}")]
    HandlerRegistered(String),

    #[error("UI context is closed")]
    UiContextClosed,

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Deserialization(e.to_string())
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
