//! # Render Error Types
//!
//! Errors raised by render contexts and backends.

use thiserror::Error;

use crate::token::Token;

/// Errors that a renderer can report to its worker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The Visual's content payload could not be instantiated.
    #[error("invalid content for visual {token}: {reason}")]
    InvalidContent {
        /// Visual token.
        token: Token,
        /// Why the payload was rejected.
        reason: String,
    },

    /// A handle did not belong to this context.
    #[error("unknown render handle")]
    UnknownHandle,

    /// Renderer-specific failure.
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
