//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a core
//! validation can fail inside them.

use thiserror::Error;

/// The base error type for `ts-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ts-core`.
pub type CoreResult<T> = Result<T, CoreError>;
