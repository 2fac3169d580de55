//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised when a request is rejected before any agent is invoked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Sensitivity must be within [0, 1], got {0}")]
    SensitivityOutOfRange(f64),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Max concurrency must be greater than zero")]
    ZeroConcurrency,

    #[error("Unknown request kind: {0}")]
    UnknownKind(String),

    #[error("Invalid source URI '{uri}': {reason}")]
    InvalidSource { uri: String, reason: String },
}

impl DomainError {
    /// Check if this error was caused by malformed options rather than content
    pub fn is_option_error(&self) -> bool {
        matches!(
            self,
            DomainError::SensitivityOutOfRange(_)
                | DomainError::ZeroTimeout
                | DomainError::ZeroConcurrency
        )
    }
}
