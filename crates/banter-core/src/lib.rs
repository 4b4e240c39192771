//! # Banter Core
//!
//! The core runtime of the Banter chat-bot framework.
//!
//! Banter bots are authored declaratively: incoming messages flow through a
//! tree of rules, and a matched rule's handler updates the bot's state
//! through a reducer, possibly emitting outbound messages or further
//! actions along the way.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐      ┌───────────┐      ┌─────────────────────────────┐
//! │ Delivery │─────▶│ Rule tree │─────▶│ Dispatch engine             │
//! │ (inbound)│ test │ (Matcher/ │ act  │ reduce → transitions → commit│
//! └──────────┘      │ Transform)│      │        → drain queue        │
//!                   └───────────┘      └─────────────────────────────┘
//! ```
//!
//! - **Routing** ([`Rule`], [`Matcher`], [`Transform`]): a depth-first walk
//!   that narrows and rewrites the message, collecting action handlers from
//!   matched nodes. No-match is a normal outcome.
//! - **Dispatch** ([`Bot::dispatch`], [`Behavior::reduce`]): a serialized
//!   pipeline with one in-flight transition per bot, mutations applied to
//!   transition hooks in emission order, and contending dispatches queued
//!   FIFO.
//! - **Snapshots** ([`Bot::push_state`], [`Bot::pop_state`]): LIFO
//!   checkpoint/restore of deep-copied state for speculative execution.
//!
//! ## Example
//!
//! ```rust,ignore
//! use banter_core::{matchers, Behavior, Bot, BotState, Message, Rule, RuleContext};
//! use serde_json::{json, Value};
//!
//! struct Greeter;
//!
//! #[async_trait::async_trait]
//! impl Behavior for Greeter {
//!     fn initial_state(&self) -> Value {
//!         json!({"greeted": 0})
//!     }
//!
//!     fn mount(&self) -> Rule {
//!         Rule::when(matchers::mention("greeter")).run(|ctx: RuleContext| async move {
//!             ctx.bot.dispatch("GREET").await?;
//!             ctx.bot.send(ctx.message.reply("hello!").unwrap()).await?;
//!             Ok(Value::Null)
//!         })
//!     }
//!
//!     fn reduce(&self, state: &BotState, action: &banter_core::Action,
//!               changes: &mut banter_core::Changes)
//!               -> banter_core::DispatchResult<BotState> {
//!         match action.kind.as_str() {
//!             "GREET" => {
//!                 changes.emit("GREET");
//!                 let n = state.value()["greeted"].as_i64().unwrap_or(0);
//!                 Ok(BotState::new(json!({"greeted": n + 1})))
//!             }
//!             _ => Ok(state.clone()),
//!         }
//!     }
//! }
//!
//! # async fn run() {
//! let bot = Bot::new(Greeter);
//! bot.handle_message(Message::inbound("@greeter hi", "sam")).await.unwrap();
//! # }
//! ```

pub mod action;
pub mod behavior;
pub mod bot;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod matcher_builders;
pub mod message;
pub mod rule;
pub mod snapshot;
pub mod state;
pub mod trace;

/// Matcher authoring vocabulary, re-exported under a short path.
pub mod matchers {
    pub use crate::matcher_builders::{any, command, content, content_regex, from, mention};
}

pub use action::{Action, Changes, Mutation};
pub use behavior::Behavior;
pub use bot::{Bot, BotBuilder};
pub use delivery::{Delivery, NullDelivery};
pub use engine::{DispatchOutcome, Engine};
pub use error::{
    BotError, BotResult, DeliveryError, DeliveryResult, DispatchError, DispatchResult,
};
pub use matcher::{MatchFn, Matcher, Transform};
pub use message::Message;
pub use rule::{BoxedRuleHandler, Rule, RuleContext, RuleHandler};
pub use snapshot::SnapshotStack;
pub use state::BotState;
pub use trace::{NopTrace, Trace, TracingTrace};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::action::{Action, Changes, Mutation};
    pub use crate::behavior::Behavior;
    pub use crate::bot::Bot;
    pub use crate::delivery::Delivery;
    pub use crate::error::{BotError, BotResult, DispatchError, DispatchResult};
    pub use crate::matcher::{MatchFn, Matcher, Transform};
    pub use crate::matchers;
    pub use crate::message::Message;
    pub use crate::rule::{Rule, RuleContext};
    pub use crate::state::BotState;
}
