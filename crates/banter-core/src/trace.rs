//! Routing trace capability.
//!
//! Rule-tree tracing is a side effect gated by a debug flag; it must never
//! affect matching or transform outcomes. Instead of a global flag and bare
//! print calls, the sink is an injected capability: bots default to
//! [`TracingTrace`] (which forwards to the `tracing` subscriber) and tests
//! can inject [`NopTrace`].

use tracing::debug;

/// An indent-aware sink for routing trace lines.
pub trait Trace: Send + Sync {
    /// Records one trace line at the given tree depth.
    fn line(&self, depth: usize, text: &str);
}

/// The default sink: forwards trace lines to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrace;

impl Trace for TracingTrace {
    fn line(&self, depth: usize, text: &str) {
        let indent = depth * 2;
        debug!(target: "banter::route", "{:indent$}{text}", "");
    }
}

/// A sink that drops every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopTrace;

impl Trace for NopTrace {
    fn line(&self, _depth: usize, _text: &str) {}
}

/// One routing pass's trace settings.
///
/// `override_debug` is the per-call debug flag; when absent, each node's own
/// debug setting decides whether its identity line is emitted. The root
/// preview line is not gated: the sink sees it on every pass.
pub(crate) struct TraceSession<'a> {
    sink: &'a dyn Trace,
    override_debug: Option<bool>,
}

impl<'a> TraceSession<'a> {
    pub(crate) fn new(sink: &'a dyn Trace, override_debug: Option<bool>) -> Self {
        Self {
            sink,
            override_debug,
        }
    }

    pub(crate) fn enabled_for(&self, node_default: bool) -> bool {
        self.override_debug.unwrap_or(node_default)
    }

    pub(crate) fn line(&self, depth: usize, text: &str) {
        self.sink.line(depth, text);
    }
}

const PREVIEW_CHARS: usize = 40;

/// Truncates content to a short preview, appending an ellipsis when cut.
pub(crate) fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(preview("hello"), "hello");
    }

    #[test]
    fn long_content_is_cut_at_forty_chars() {
        let long = "x".repeat(60);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn exactly_forty_chars_gets_no_ellipsis() {
        let exact = "x".repeat(40);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn override_beats_node_default() {
        let session = TraceSession::new(&NopTrace, Some(false));
        assert!(!session.enabled_for(true));

        let session = TraceSession::new(&NopTrace, None);
        assert!(session.enabled_for(true));
        assert!(!session.enabled_for(false));
    }
}
