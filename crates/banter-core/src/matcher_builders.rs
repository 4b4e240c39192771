//! Matcher builder functions for common rule shapes.
//!
//! This module provides the authoring vocabulary for rule trees: matchers
//! keyed on content, author, mentions, and slash commands. Matchers that
//! consume part of the content (mentions, commands) rewrite the message so
//! descendant rules see only what remains.
//!
//! # Example
//!
//! ```rust,ignore
//! use banter_core::matchers::{command, content, mention};
//! use banter_core::Rule;
//!
//! let tree = Rule::when(mention("planner"))
//!     .child(Rule::when(content("plan")).run(plan_handler))
//!     .child(Rule::when(command("status")).run(status_handler));
//! ```

use regex::Regex;

use crate::matcher::{MatchFn, Matcher, Transform};
use crate::message::Message;

/// Matches every message, unchanged.
pub fn any() -> impl Matcher {
    MatchFn::new(|_: &Message| Some(Transform::Keep))
}

/// Matches messages whose content contains the given fragment.
pub fn content(fragment: impl Into<String>) -> impl Matcher {
    let fragment = fragment.into();
    MatchFn::new(move |msg: &Message| msg.content.contains(&fragment).then_some(Transform::Keep))
}

/// Matches messages whose content matches the given pattern.
pub fn content_regex(pattern: Regex) -> impl Matcher {
    MatchFn::new(move |msg: &Message| pattern.is_match(&msg.content).then_some(Transform::Keep))
}

/// Matches messages written by the given author.
pub fn from(author: impl Into<String>) -> impl Matcher {
    let author = author.into();
    MatchFn::new(move |msg: &Message| {
        (msg.author.as_deref() == Some(author.as_str())).then_some(Transform::Keep)
    })
}

/// Matches messages that open by addressing `name`, and strips the mention.
///
/// Both `@name` and `name:` forms are recognized, case-insensitively. The
/// rewritten message carries the remaining content with surrounding
/// whitespace trimmed, so descendant rules match against the actual request.
pub fn mention(name: impl Into<String>) -> impl Matcher {
    let name = name.into();
    MatchFn::new(move |msg: &Message| {
        let trimmed = msg.content.trim_start();
        let rest = strip_prefix_ci(trimmed, &format!("@{name}"))
            .or_else(|| strip_prefix_ci(trimmed, &format!("{name}:")))?;
        Some(Transform::Rewrite(msg.with_content(rest.trim())))
    })
}

/// Strips `prefix` from the start of `text`, ignoring ASCII case.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Matches messages that start with the given slash command, and strips it.
///
/// The slash is prepended automatically if missing, and matching is
/// case-insensitive, so `command("plan")` matches `/plan`, `/Plan`, etc.
pub fn command(word: impl Into<String>) -> impl Matcher {
    let word = word.into();
    let full = if word.starts_with('/') {
        word
    } else {
        format!("/{word}")
    };

    MatchFn::new(move |msg: &Message| {
        let rest = strip_prefix_ci(msg.content.trim_start(), &full)?;
        // "/planning" must not match "/plan".
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(Transform::Rewrite(msg.with_content(rest.trim())))
    })
}
