//! The contract a concrete bot supplies.
//!
//! A [`Behavior`] bundles everything application-specific about one bot:
//! its initial state, its rule tree, its reducer, and (optionally) its
//! transition hook. The framework owns everything else: routing, dispatch
//! serialization, state ownership.
//!
//! # Contract
//!
//! - [`reduce`](Behavior::reduce) must be synchronous and side-effect-free
//!   except through the [`Changes`] recorder. It runs under the engine lock,
//!   so it must also be fast. Return the input state (cloned; clones share
//!   identity) to signal a no-op.
//! - [`transition`](Behavior::transition) runs once per emitted mutation, in
//!   emission order, each invocation fully awaited before the next. This is
//!   where side effects coupled to a state change belong.
//! - [`mount`](Behavior::mount) builds the rule tree; it is called once, on
//!   the first message the bot handles, never at construction time.

use async_trait::async_trait;
use serde_json::Value;

use crate::action::{Action, Changes, Mutation};
use crate::error::DispatchResult;
use crate::rule::Rule;
use crate::state::BotState;

/// Application-specific bot logic.
#[async_trait]
pub trait Behavior: Send + Sync + 'static {
    /// The state installed when the bot initializes on its first message.
    fn initial_state(&self) -> Value {
        Value::Null
    }

    /// Builds the rule tree this bot routes messages through.
    fn mount(&self) -> Rule;

    /// Computes the next state for an action, recording mutations as it goes.
    fn reduce(
        &self,
        state: &BotState,
        action: &Action,
        changes: &mut Changes,
    ) -> DispatchResult<BotState>;

    /// Runs side effects for one mutation of a committed-to transition.
    ///
    /// The default is a no-op. Errors reject the whole dispatch without
    /// committing `next`.
    async fn transition(
        &self,
        action: &Action,
        prev: &BotState,
        next: &BotState,
        mutation: &Mutation,
    ) -> DispatchResult<()> {
        let _ = (action, prev, next, mutation);
        Ok(())
    }
}
