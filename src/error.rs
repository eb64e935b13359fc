//! Error types
//!
//! The simulation itself never fails. Errors only come from the outside world:
//! a missing canvas at startup (fatal) or a storage backend (always recovered).

use thiserror::Error;

/// Fatal startup preconditions
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("canvas element #{0} not found")]
    CanvasUnavailable(String),
    #[error("2D rendering context not available: {0}")]
    ContextUnavailable(String),
}

/// Storage failures (callers log and fall back to defaults)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available in this environment")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
