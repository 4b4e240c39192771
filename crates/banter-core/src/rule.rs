//! The declarative rule tree and its routing protocol.
//!
//! A [`Rule`] node groups a [`Matcher`] with an optional action handler and
//! any number of child rules. Routing a message is a depth-first walk:
//!
//! 1. The node's matcher tests the message; no-match prunes the subtree.
//! 2. The matcher's transform produces the effective message for the node's
//!    handler *and* its descendants.
//! 3. Matched handlers are collected in tree order and later executed
//!    strictly sequentially.
//!
//! An [`exclusive`](Rule::exclusive) child that produces actions stops its
//! later siblings from being scanned.
//!
//! # Example
//!
//! ```rust,ignore
//! use banter_core::{Rule, matchers};
//!
//! let tree = Rule::root()
//!     .child(
//!         Rule::when(matchers::mention("planner"))
//!             .name("planner")
//!             .child(Rule::when(matchers::content("plan")).name("plan").run(plan)),
//!     )
//!     .child(Rule::when(matchers::command("help")).name("help").run(help));
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::bot::Bot;
use crate::error::BotResult;
use crate::matcher::Matcher;
use crate::matcher_builders::any;
use crate::message::Message;
use crate::trace::TraceSession;

// ============================================================================
// Handlers
// ============================================================================

/// Everything a rule handler gets to work with.
///
/// The message is the transformed message as seen at the handler's node; the
/// bot handle is for dispatching actions and sending replies.
#[derive(Clone)]
pub struct RuleContext {
    /// The effective message at this node.
    pub message: Message,
    /// The bot that routed the message.
    pub bot: Bot,
}

/// An action handler attached to a rule node.
pub trait RuleHandler: Send + Sync {
    /// Runs the handler, returning an arbitrary JSON result.
    fn run(&self, ctx: RuleContext) -> BoxFuture<'static, BotResult<Value>>;
}

/// A boxed rule handler.
pub type BoxedRuleHandler = Arc<dyn RuleHandler>;

struct HandlerFn<F>(F);

impl<F, Fut> RuleHandler for HandlerFn<F>
where
    F: Fn(RuleContext) -> Fut + Send + Sync,
    Fut: Future<Output = BotResult<Value>> + Send + 'static,
{
    fn run(&self, ctx: RuleContext) -> BoxFuture<'static, BotResult<Value>> {
        Box::pin((self.0)(ctx))
    }
}

// ============================================================================
// Rule
// ============================================================================

/// One node of the rule tree.
pub struct Rule {
    matcher: Arc<dyn Matcher>,
    handler: Option<BoxedRuleHandler>,
    children: Vec<Rule>,
    exclusive: bool,
    debug: bool,
    name: Option<String>,
}

impl Rule {
    /// Creates a rule gated by the given matcher.
    pub fn when(matcher: impl Matcher + 'static) -> Self {
        Self {
            matcher: Arc::new(matcher),
            handler: None,
            children: Vec::new(),
            exclusive: false,
            debug: false,
            name: None,
        }
    }

    /// Creates a rule that matches every message unchanged.
    pub fn root() -> Self {
        Self::when(any())
    }

    /// Attaches an async-closure handler to this node.
    pub fn run<F, Fut>(self, f: F) -> Self
    where
        F: Fn(RuleContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BotResult<Value>> + Send + 'static,
    {
        self.run_handler(HandlerFn(f))
    }

    /// Attaches a pre-built handler to this node.
    pub fn run_handler(mut self, handler: impl RuleHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Adds a child rule. Children are tested in the order they are added.
    pub fn child(mut self, rule: Rule) -> Self {
        self.children.push(rule);
        self
    }

    /// Makes this node stop later siblings once it produces actions.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Enables identity tracing for this node when no per-call flag is given.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Names this node for tracing.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Tests a message against this subtree, collecting matched handlers.
    ///
    /// Returns the handlers in tree order, each bound to the message as
    /// transformed at its node. An empty result is the normal no-match
    /// outcome, not an error.
    pub(crate) fn test(
        &self,
        message: &Message,
        trace: &TraceSession<'_>,
        level: usize,
    ) -> Vec<PreparedAction> {
        let Some(transform) = self.matcher.matches(message) else {
            return Vec::new();
        };
        let effective = transform.apply(message);

        if trace.enabled_for(self.debug) {
            trace.line(level, self.name.as_deref().unwrap_or("rule"));
        }

        let mut actions = Vec::new();
        if let Some(handler) = &self.handler {
            actions.push(PreparedAction {
                handler: Arc::clone(handler),
                message: effective.clone(),
            });
        }
        for child in &self.children {
            let produced = child.test(&effective, trace, level + 1);
            let stop = child.exclusive && !produced.is_empty();
            actions.extend(produced);
            if stop {
                break;
            }
        }
        actions
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("has_handler", &self.handler.is_some())
            .field("children", &self.children.len())
            .field("exclusive", &self.exclusive)
            .finish()
    }
}

/// A matched handler bound to the message it should see.
pub(crate) struct PreparedAction {
    pub(crate) handler: BoxedRuleHandler,
    pub(crate) message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatchFn, Transform};
    use crate::matcher_builders::{content, mention};
    use crate::trace::NopTrace;
    use serde_json::json;

    fn noop(_ctx: RuleContext) -> std::future::Ready<BotResult<Value>> {
        std::future::ready(Ok(Value::Null))
    }

    fn collect(rule: &Rule, raw: &str) -> Vec<Message> {
        let session = TraceSession::new(&NopTrace, None);
        rule.test(&Message::inbound(raw, "sam"), &session, 0)
            .into_iter()
            .map(|prepared| prepared.message)
            .collect()
    }

    #[test]
    fn no_match_produces_nothing() {
        let tree = Rule::when(content("deploy")).run(noop);
        assert!(collect(&tree, "plan the week").is_empty());
    }

    #[test]
    fn no_match_prunes_the_whole_subtree() {
        let tree = Rule::when(content("deploy"))
            .child(Rule::root().run(noop));
        assert!(collect(&tree, "plan the week").is_empty());
    }

    #[test]
    fn transform_is_seen_by_descendants() {
        let tree = Rule::when(mention("planner"))
            .child(Rule::when(content("plan")).run(noop));

        let seen = collect(&tree, "@planner plan the week");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].content, "plan the week");
    }

    #[test]
    fn handlers_collect_in_tree_order() {
        let upper = MatchFn::new(|msg: &Message| {
            Some(Transform::Rewrite(msg.with_content(msg.content.to_uppercase())))
        });
        let tree = Rule::root()
            .run(noop)
            .child(Rule::when(upper).run(noop))
            .child(Rule::root().run(noop));

        let seen = collect(&tree, "hi");
        let contents: Vec<_> = seen.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["hi", "HI", "hi"]);
    }

    #[test]
    fn exclusive_child_stops_later_siblings() {
        let tree = Rule::root()
            .child(Rule::when(content("plan")).exclusive(true).run(noop))
            .child(Rule::root().run(noop));

        assert_eq!(collect(&tree, "plan the week").len(), 1);
        // When the exclusive child declines, the fallback sibling still runs.
        assert_eq!(collect(&tree, "hello").len(), 1);
    }

    #[test]
    fn retesting_a_transformed_message_is_stable() {
        let tree = Rule::when(mention("planner")).run(noop);

        let first = collect(&tree, "@planner plan");
        let again = collect(&tree, "@planner plan");
        assert_eq!(first, again);
    }

    #[test]
    fn handler_results_flow_through_run() {
        // Builder smoke test: a closure handler returning a value compiles
        // and is stored on the node.
        let rule = Rule::root()
            .name("answer")
            .run(|_ctx| std::future::ready(Ok(json!(42))));
        assert!(rule.handler.is_some());
    }
}
