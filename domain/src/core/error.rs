//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Invalid message target: {0}")]
    InvalidTarget(String),

    #[error("Discussion already running for session {0}")]
    AlreadyRunning(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = DomainError::SessionNotFound("abc".to_string());
        assert_eq!(error.to_string(), "Session not found: abc");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::InvalidTarget("x".to_string()).is_cancelled());
    }
}
