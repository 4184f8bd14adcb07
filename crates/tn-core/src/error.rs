//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where configuration or parsing can fail.

use thiserror::Error;

/// Errors produced by `tn-core` (configuration and label parsing).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown transport type {0:?}")]
    UnknownTransport(String),

    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `tn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
