//! Transport error types.

use thiserror::Error;

/// Errors raised while standing up or tearing down the control server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding the listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors a control call can surface to its HTTP caller.
///
/// Every variant is caught at the boundary and formatted into the JSON error
/// envelope; none of them terminates the listening process.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// The request used a method other than POST.
    #[error("control requests must be POST (got {http_method})")]
    MethodNotAllowed {
        /// The HTTP method that was used.
        http_method: String,
    },

    /// The request body was not a valid control envelope.
    #[error("malformed control request: {0}")]
    Malformed(String),

    /// The request named no method.
    #[error("missing 'method' field")]
    MethodMissing,

    /// The named method is not on the allow-list.
    #[error("unknown method '{method}'")]
    UnknownMethod {
        /// The method that was requested.
        method: String,
    },

    /// The arguments did not fit the method's signature.
    #[error("bad arguments for '{method}': {reason}")]
    BadArgs {
        /// The method being called.
        method: String,
        /// Why the arguments were rejected.
        reason: String,
    },

    /// The delegated service call itself failed.
    #[error("{0}")]
    Service(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for control calls.
pub type ControlResult<T> = Result<T, ControlError>;
