//! Errors crossing the protocol seams.

use thiserror::Error;

/// Errors raised by page operations.
#[derive(Debug, Error)]
pub enum PageError {
    /// Navigation to a URL failed.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// JavaScript evaluation threw or produced no value.
    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    /// A page operation exceeded its bounded timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The connection to the page was lost.
    #[error("Page connection lost: {0}")]
    Connection(String),
}

/// Classification of a routine failure, used for status-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineErrorKind {
    /// The routine hit an authorization failure against the target.
    Unauthorized,
    /// Any other failure.
    Failed,
}

/// Error raised by an automation routine.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RoutineError {
    pub kind: RoutineErrorKind,
    pub message: String,
}

impl RoutineError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            kind: RoutineErrorKind::Failed,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: RoutineErrorKind::Unauthorized,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == RoutineErrorKind::Unauthorized
    }
}

impl From<PageError> for RoutineError {
    fn from(e: PageError) -> Self {
        Self::failed(e.to_string())
    }
}
