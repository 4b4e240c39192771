//! # Banter
//!
//! A declarative, reducer-driven chat-bot authoring framework.
//!
//! Messages route through a tree of rules; a matched rule's handler
//! dispatches actions; a reducer computes the next state and emits
//! mutations; transition hooks run side effects once per mutation, in
//! order. Dispatches are serialized per bot; contention queues, FIFO.
//!
//! This crate re-exports the pieces:
//!
//! - [`banter_core`]: messages, matchers, rule trees, the dispatch engine,
//!   snapshots.
//! - [`banter_runtime`]: configuration, logging, the run loop.
//! - [`banter_transport`]: the HTTP control surface.
//!
//! ## Example
//!
//! ```rust,ignore
//! use banter::prelude::*;
//! use banter::Runtime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bot = Bot::new(MyBehavior);
//!     Runtime::new(bot).run().await?;
//!     Ok(())
//! }
//! ```

pub use banter_core;
pub use banter_runtime;
pub use banter_transport;

pub use banter_core::{
    Action, Behavior, Bot, BotBuilder, BotError, BotResult, BotState, Changes, Delivery,
    DeliveryError, DispatchError, DispatchOutcome, DispatchResult, MatchFn, Matcher, Message,
    Mutation, NullDelivery, Rule, RuleContext, RuleHandler, Transform, matchers,
};
pub use banter_runtime::{BanterConfig, ConfigLoader, Runtime};
pub use banter_transport::{ControlHandle, ControlService, serve};

/// Prelude for common imports.
pub mod prelude {
    pub use banter_core::prelude::*;
}
