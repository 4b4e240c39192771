//! Message values for the Banter framework.
//!
//! A [`Message`] is an immutable value describing one chat message, inbound
//! or outbound. Matchers read messages; transforms produce *new* messages.
//! Nothing in the framework mutates a message in place.
//!
//! # Example
//!
//! ```rust,ignore
//! use banter_core::Message;
//!
//! let inbound = Message::inbound("@planner plan http://teamwork.com/x", "sarah");
//! let reply = Message::outbound("On it!", "sarah");
//! ```

use serde::{Deserialize, Serialize};

/// One chat message.
///
/// Inbound messages carry an `author`; outbound messages carry a `to`
/// recipient. Both may name a `room`. Equality is structural, which is what
/// test assertions compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The textual content of the message.
    pub content: String,

    /// Who wrote the message (inbound direction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Who the message is addressed to (outbound direction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// The room or channel the message belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl Message {
    /// Creates an inbound message from the given author.
    pub fn inbound(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Some(author.into()),
            to: None,
            room: None,
        }
    }

    /// Creates an outbound message addressed to the given recipient.
    pub fn outbound(content: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: None,
            to: Some(to.into()),
            room: None,
        }
    }

    /// Sets the room this message belongs to.
    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Returns a copy of this message with different content.
    ///
    /// This is the primitive transforms are built from: author, recipient and
    /// room carry over unchanged.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: self.author.clone(),
            to: self.to.clone(),
            room: self.room.clone(),
        }
    }

    /// Builds a reply addressed at this message's author.
    ///
    /// Returns `None` when the message has no author to reply to.
    pub fn reply(&self, content: impl Into<String>) -> Option<Self> {
        self.author.as_ref().map(|author| Self {
            content: content.into(),
            author: None,
            to: Some(author.clone()),
            room: self.room.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_content_preserves_routing_fields() {
        let original = Message::inbound("hello", "sam").room("general");
        let rewritten = original.with_content("hi");

        assert_eq!(rewritten.content, "hi");
        assert_eq!(rewritten.author.as_deref(), Some("sam"));
        assert_eq!(rewritten.room.as_deref(), Some("general"));
        // The original is untouched.
        assert_eq!(original.content, "hello");
    }

    #[test]
    fn reply_targets_the_author() {
        let inbound = Message::inbound("ping", "sam");
        let reply = inbound.reply("pong").unwrap();

        assert_eq!(reply.to.as_deref(), Some("sam"));
        assert_eq!(reply.author, None);
    }

    #[test]
    fn reply_requires_an_author() {
        let outbound = Message::outbound("ping", "sam");
        assert!(outbound.reply("pong").is_none());
    }
}
