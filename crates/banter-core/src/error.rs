//! Unified error types for the Banter core runtime.
//!
//! This module provides standardized error types used across core components.
//! Boundary-level errors (control surface, config) are defined in the
//! transport and runtime crates.

use thiserror::Error;

use crate::action::{Action, Mutation};

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Errors produced by the dispatch engine.
///
/// A failed dispatch never leaves the engine busy: the in-flight marker is
/// released and queued dispatches still run, whichever variant is returned.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The reducer rejected the action.
    #[error("reducer failed for '{action}': {reason}")]
    Reduce {
        /// Kind of the action being reduced.
        action: String,
        /// Reason for failure.
        reason: String,
    },

    /// A transition hook failed for one mutation.
    #[error("transition '{mutation}' failed: {reason}")]
    Transition {
        /// Kind of the mutation whose hook failed.
        mutation: String,
        /// Reason for failure.
        reason: String,
    },

    /// The engine stopped before the queued dispatch completed.
    #[error("dispatch abandoned before completion")]
    Abandoned,
}

impl DispatchError {
    /// Builds a [`DispatchError::Reduce`] for the given action.
    pub fn reduce(action: &Action, reason: impl Into<String>) -> Self {
        Self::Reduce {
            action: action.kind.clone(),
            reason: reason.into(),
        }
    }

    /// Builds a [`DispatchError::Transition`] for the given mutation.
    pub fn transition(mutation: &Mutation, reason: impl Into<String>) -> Self {
        Self::Transition {
            mutation: mutation.kind.clone(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Delivery Errors
// =============================================================================

/// Errors that can occur when handing a message to the delivery collaborator.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The message could not be sent.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The delivery channel is no longer accepting messages.
    #[error("delivery channel closed")]
    Closed,
}

// =============================================================================
// Bot Errors
// =============================================================================

/// Umbrella error for message handling and rule handlers.
#[derive(Debug, Clone, Error)]
pub enum BotError {
    /// Dispatch failed while a handler was running.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Outbound delivery failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// A rule handler failed on its own terms.
    #[error("handler failed: {0}")]
    Handler(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Result type for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Result type for bot-level operations.
pub type BotResult<T> = Result<T, BotError>;
