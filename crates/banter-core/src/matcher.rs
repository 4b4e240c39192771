//! Matcher protocol for the Banter rule tree.
//!
//! A [`Matcher`] is the capability every rule node carries: test a message,
//! optionally rewrite it, report match or no-match. Returning `None` means
//! the node (and its whole subtree) does not apply; returning a
//! [`Transform`], including the unchanged [`Transform::Keep`] marker,
//! produces the message seen by the node's handler and descendants.
//!
//! No-match is a normal outcome, never an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use banter_core::{MatchFn, Matcher, Message, Transform};
//!
//! let shouting = MatchFn::new(|msg: &Message| {
//!     msg.content
//!         .ends_with('!')
//!         .then(|| Transform::Rewrite(msg.with_content(msg.content.to_uppercase())))
//! });
//! ```

use crate::message::Message;

/// The result of a successful match: how to derive the effective message.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Pass the message through unchanged.
    Keep,
    /// Replace the message with a rewritten copy.
    Rewrite(Message),
}

impl Transform {
    /// Applies this transform to the original message.
    pub fn apply(self, original: &Message) -> Message {
        match self {
            Self::Keep => original.clone(),
            Self::Rewrite(message) => message,
        }
    }
}

/// The capability a rule node uses to decide routing.
///
/// Implementations must be pure with respect to the message: the same content
/// always yields the same decision and the same transform.
pub trait Matcher: Send + Sync {
    /// Tests the message. `None` is no-match; `Some` carries the transform.
    fn matches(&self, message: &Message) -> Option<Transform>;
}

/// A matcher built from a plain closure.
pub struct MatchFn<F>(F);

impl<F> MatchFn<F>
where
    F: Fn(&Message) -> Option<Transform> + Send + Sync,
{
    /// Wraps a closure as a matcher.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Matcher for MatchFn<F>
where
    F: Fn(&Message) -> Option<Transform> + Send + Sync,
{
    fn matches(&self, message: &Message) -> Option<Transform> {
        (self.0)(message)
    }
}
