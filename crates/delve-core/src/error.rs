//! Engine error type
//!
//! Both kinds are caller-input errors: they are surfaced immediately and
//! never retried.

use thiserror::Error;

/// Errors returned by generation and coordinate queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Generation was asked for impossible constraints
    #[error("invalid generation parameters: {reason}")]
    InvalidParams { reason: String },

    /// A coordinate fell outside `[0, width) x [0, height)`
    #[error("coordinate ({x}, {y}) outside {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

impl EngineError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidParams {
            reason: reason.into(),
        }
    }
}

/// Result alias used across the engine
pub type Result<T> = core::result::Result<T, EngineError>;
