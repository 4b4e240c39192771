//! Harness error types.

use thiserror::Error;

/// Errors raised by harness assertions.
#[derive(Debug, Clone, Error)]
pub enum HarnessError {
    /// A message was expected to match and did not.
    ///
    /// Carries both sides so the failure reads as a diff.
    #[error("message did not match\n  expected: {expected}\n    actual: {actual}")]
    MatchFailed {
        /// What the assertion wanted.
        expected: String,
        /// What was actually captured.
        actual: String,
    },

    /// An assertion ran against a message that was never received.
    #[error("expected a message, but none was received")]
    NoMessage,
}

/// Result type for harness assertions.
pub type HarnessResult<T> = Result<T, HarnessError>;
