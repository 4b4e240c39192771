//! The bot instance: routing entry point and state owner.
//!
//! A [`Bot`] ties a [`Behavior`] to the dispatch engine, the delivery
//! collaborator, and the trace sink. It is a cheap-to-clone handle; rule
//! handlers receive a clone so they can dispatch actions and send replies
//! while the routing pass is still running.
//!
//! A bot initializes lazily: the rule tree is mounted and the initial state
//! installed on the *first* message it handles, not at construction time.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::action::Action;
use crate::behavior::Behavior;
use crate::delivery::{Delivery, NullDelivery};
use crate::engine::{DispatchOutcome, Engine};
use crate::error::{BotResult, DeliveryResult};
use crate::message::Message;
use crate::rule::{Rule, RuleContext};
use crate::snapshot::SnapshotStack;
use crate::state::BotState;
use crate::trace::{NopTrace, Trace, TraceSession, TracingTrace, preview};

struct BotShared {
    behavior: Arc<dyn Behavior>,
    engine: Engine,
    delivery: Arc<dyn Delivery>,
    trace: Arc<dyn Trace>,
    debug: bool,
    mount: OnceLock<Rule>,
    snapshots: SnapshotStack,
}

impl BotShared {
    /// Mounts the rule tree and installs the initial state, once.
    fn ensure_initialized(&self) -> &Rule {
        self.mount.get_or_init(|| {
            self.engine
                .install_state(BotState::new(self.behavior.initial_state()));
            self.behavior.mount()
        })
    }
}

/// A single bot instance.
///
/// Clones share the same engine, state, and queue: there is exactly one
/// logical bot per [`Bot::new`] call, however many handles to it exist.
#[derive(Clone)]
pub struct Bot {
    shared: Arc<BotShared>,
}

impl Bot {
    /// Creates a bot with default collaborators: messages are dropped
    /// rather than delivered, and routing traces go to the `tracing`
    /// subscriber.
    pub fn new(behavior: impl Behavior) -> Self {
        Self::builder(behavior).build()
    }

    /// Starts building a bot with explicit collaborators.
    pub fn builder(behavior: impl Behavior) -> BotBuilder {
        BotBuilder {
            behavior: Arc::new(behavior),
            delivery: None,
            trace: None,
            debug: false,
        }
    }

    /// Handles one inbound message: route, then execute matched handlers.
    ///
    /// Handlers run strictly sequentially, in the order the tree produced
    /// them, each fully awaited before the next. Returns `Ok(None)` when
    /// nothing matched; absence of a match is a normal outcome.
    pub async fn handle_message(&self, message: Message) -> BotResult<Option<Vec<Value>>> {
        self.handle_message_with(message, None).await
    }

    /// Like [`handle_message`](Self::handle_message), with a per-call debug
    /// override for routing traces. `None` falls back to each node's own
    /// debug setting.
    pub async fn handle_message_with(
        &self,
        message: Message,
        debug: Option<bool>,
    ) -> BotResult<Option<Vec<Value>>> {
        let mount = self.shared.ensure_initialized();

        let override_debug = debug.or(self.shared.debug.then_some(true));
        let session = TraceSession::new(self.shared.trace.as_ref(), override_debug);
        session.line(0, &format!("testing \"{}\"", preview(&message.content)));

        let prepared = mount.test(&message, &session, 1);
        if prepared.is_empty() {
            return Ok(None);
        }

        let mut results = Vec::with_capacity(prepared.len());
        for action in prepared {
            let ctx = RuleContext {
                message: action.message,
                bot: self.clone(),
            };
            results.push(action.handler.run(ctx).await?);
        }
        Ok(Some(results))
    }

    /// Dispatches an action through the engine's serialized pipeline.
    pub async fn dispatch(&self, action: impl Into<Action>) -> DispatchOutcome {
        self.shared.engine.dispatch(action).await
    }

    /// Sends an outbound message through the delivery collaborator.
    pub async fn send(&self, message: Message) -> DeliveryResult<()> {
        self.shared.delivery.send_message(message).await
    }

    /// Returns a handle to the live state.
    pub fn state(&self) -> BotState {
        self.shared.engine.state()
    }

    /// Deep-copies the live state onto the snapshot stack.
    pub fn push_state(&self) {
        self.shared
            .snapshots
            .push(self.shared.engine.state().to_value());
    }

    /// Restores the most recent snapshot as the live state, bypassing
    /// reduce and transition hooks.
    ///
    /// Returns the restored state, or `None` when the stack is empty (the
    /// live state is left untouched). Not serialized against an in-flight
    /// dispatch; callers coordinate checkpoint/restore with their own
    /// dispatching.
    pub fn pop_state(&self) -> Option<BotState> {
        let value = self.shared.snapshots.pop()?;
        let state = BotState::new(value);
        self.shared.engine.install_state(state.clone());
        Some(state)
    }

    /// Returns how many snapshots are currently held.
    pub fn snapshot_depth(&self) -> usize {
        self.shared.snapshots.depth()
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("initialized", &self.shared.mount.get().is_some())
            .field("snapshots", &self.shared.snapshots.depth())
            .finish()
    }
}

/// Builder for [`Bot`].
pub struct BotBuilder {
    behavior: Arc<dyn Behavior>,
    delivery: Option<Arc<dyn Delivery>>,
    trace: Option<Arc<dyn Trace>>,
    debug: bool,
}

impl BotBuilder {
    /// Sets the delivery collaborator.
    pub fn delivery(mut self, delivery: Arc<dyn Delivery>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Sets the routing trace sink.
    pub fn trace(mut self, trace: Arc<dyn Trace>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Silences routing traces entirely.
    pub fn quiet(mut self) -> Self {
        self.trace = Some(Arc::new(NopTrace));
        self
    }

    /// Forces node-identity traces on for every routing pass.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the bot.
    pub fn build(self) -> Bot {
        let engine = Engine::new(Arc::clone(&self.behavior));
        Bot {
            shared: Arc::new(BotShared {
                behavior: self.behavior,
                engine,
                delivery: self.delivery.unwrap_or_else(|| Arc::new(NullDelivery)),
                trace: self.trace.unwrap_or_else(|| Arc::new(TracingTrace)),
                debug: self.debug,
                mount: OnceLock::new(),
                snapshots: SnapshotStack::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Changes, Mutation};
    use crate::error::DispatchResult;
    use crate::matcher_builders::{content, mention};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Captures outbound messages for assertions.
    #[derive(Default)]
    struct CaptureDelivery {
        sent: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl Delivery for CaptureDelivery {
        async fn send_message(&self, message: Message) -> DeliveryResult<()> {
            self.sent.lock().push(message);
            Ok(())
        }
    }

    /// The planner: `PLAN` carries a tasklist URL and moves the bot from
    /// waiting to ready.
    struct Planner;

    #[async_trait]
    impl Behavior for Planner {
        fn initial_state(&self) -> Value {
            json!({"state": "waiting"})
        }

        fn mount(&self) -> Rule {
            Rule::when(mention("planner")).child(
                Rule::when(content("plan"))
                    .name("plan")
                    .run(|ctx: RuleContext| async move {
                        let url = ctx
                            .message
                            .content
                            .split_whitespace()
                            .find(|word| word.contains("teamwork.com"));
                        match url {
                            Some(url) => {
                                ctx.bot
                                    .dispatch(("PLAN", json!({"tasklist": url})))
                                    .await?;
                                Ok(json!("planned"))
                            }
                            None => {
                                let reply = ctx
                                    .message
                                    .reply("Uh oh, I don't recognize that tasklist!")
                                    .expect("inbound messages carry an author");
                                ctx.bot.send(reply).await?;
                                Ok(Value::Null)
                            }
                        }
                    }),
            )
        }

        fn reduce(
            &self,
            state: &BotState,
            action: &Action,
            changes: &mut Changes,
        ) -> DispatchResult<BotState> {
            match action.kind.as_str() {
                "PLAN" => {
                    changes.emit("PLAN");
                    Ok(BotState::new(json!({
                        "state": "ready",
                        "tasklist": action.payload["tasklist"],
                    })))
                }
                _ => Ok(state.clone()),
            }
        }

        async fn transition(
            &self,
            _action: &Action,
            _prev: &BotState,
            _next: &BotState,
            _mutation: &Mutation,
        ) -> DispatchResult<()> {
            Ok(())
        }
    }

    fn planner_bot() -> (Bot, Arc<CaptureDelivery>) {
        let delivery = Arc::new(CaptureDelivery::default());
        let bot = Bot::builder(Planner)
            .delivery(delivery.clone())
            .quiet()
            .build();
        (bot, delivery)
    }

    #[tokio::test]
    async fn initialization_waits_for_the_first_message() {
        let (bot, _delivery) = planner_bot();
        assert_eq!(bot.state().value(), &Value::Null);

        // Even an unmatched message initializes the bot.
        bot.handle_message(Message::inbound("hello", "sam"))
            .await
            .unwrap();
        assert_eq!(bot.state().value(), &json!({"state": "waiting"}));
    }

    #[tokio::test]
    async fn unmatched_messages_produce_nothing() {
        let (bot, delivery) = planner_bot();

        let outcome = bot
            .handle_message(Message::inbound("just chatting", "sam"))
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(delivery.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn recognized_tasklist_dispatches_a_plan() {
        let (bot, delivery) = planner_bot();

        let outcome = bot
            .handle_message(Message::inbound(
                "@planner plan http://teamwork.com/x",
                "sam",
            ))
            .await
            .unwrap();

        assert_eq!(outcome, Some(vec![json!("planned")]));
        assert_eq!(
            bot.state().value(),
            &json!({"state": "ready", "tasklist": "http://teamwork.com/x"})
        );
        assert!(delivery.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_tasklist_replies_instead_of_dispatching() {
        let (bot, delivery) = planner_bot();

        bot.handle_message(Message::inbound(
            "@planner plan http://elsewhere.io/x",
            "sam",
        ))
        .await
        .unwrap();

        // State never left waiting, so nothing was dispatched.
        assert_eq!(bot.state().value(), &json!({"state": "waiting"}));
        let sent = delivery.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "Uh oh, I don't recognize that tasklist!");
        assert_eq!(sent[0].to.as_deref(), Some("sam"));
    }

    #[tokio::test]
    async fn debug_override_never_changes_outcomes() {
        let (bot, _delivery) = planner_bot();
        let message = Message::inbound("@planner plan http://teamwork.com/x", "sam");

        let traced = bot
            .handle_message_with(message.clone(), Some(true))
            .await
            .unwrap();
        let quiet = bot.handle_message_with(message, Some(false)).await.unwrap();

        assert_eq!(traced, quiet);
    }

    #[tokio::test]
    async fn snapshot_round_trip_survives_live_changes() {
        let (bot, _delivery) = planner_bot();
        bot.handle_message(Message::inbound("hello", "sam"))
            .await
            .unwrap();

        bot.push_state();
        bot.handle_message(Message::inbound(
            "@planner plan http://teamwork.com/x",
            "sam",
        ))
        .await
        .unwrap();
        assert_eq!(bot.state().value()["state"], "ready");

        let restored = bot.pop_state().expect("snapshot present");
        assert_eq!(restored.value(), &json!({"state": "waiting"}));
        assert_eq!(bot.state().value(), &json!({"state": "waiting"}));
    }

    #[tokio::test]
    async fn pop_on_an_empty_stack_leaves_state_alone() {
        let (bot, _delivery) = planner_bot();
        bot.handle_message(Message::inbound("hello", "sam"))
            .await
            .unwrap();

        assert!(bot.pop_state().is_none());
        assert_eq!(bot.state().value(), &json!({"state": "waiting"}));
    }
}
