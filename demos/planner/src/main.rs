//! Planner Bot
//!
//! A small Banter bot that plans work against a Teamwork tasklist. It shows
//! the full authoring surface:
//!
//! - a mention-gated rule tree with content matchers,
//! - a handler that either dispatches an action or replies with an error,
//! - a reducer moving the bot from `waiting` to `ready`,
//! - a transition hook sending the confirmation message.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package planner-bot
//! ```
//!
//! Then drive it over the control surface:
//!
//! ```bash
//! curl -s localhost:8321/control -d '{
//!   "method": "handle_message",
//!   "args": [{"content": "@planner plan http://teamwork.com/x", "author": "sam"}]
//! }'
//! ```

use std::sync::Arc;

use anyhow::Result;
use serde_json::{Value, json};
use tracing::info;

use banter::prelude::*;
use banter::{Delivery, DeliveryError, Runtime};

/// A delivery that logs outbound messages instead of talking to a chat
/// service. Swap in a real transport adapter to go live.
struct LogDelivery;

#[async_trait::async_trait]
impl Delivery for LogDelivery {
    async fn send_message(&self, message: Message) -> Result<(), DeliveryError> {
        info!(
            to = message.to.as_deref().unwrap_or("?"),
            content = %message.content,
            "outbound message"
        );
        Ok(())
    }
}

/// The planner's behavior.
struct Planner {
    delivery: Arc<dyn Delivery>,
}

impl Planner {
    fn new(delivery: Arc<dyn Delivery>) -> Self {
        Self { delivery }
    }
}

/// Handles "@planner plan <url>": dispatches `PLAN` for a recognized
/// tasklist, otherwise tells the author off.
async fn plan(ctx: RuleContext) -> BotResult<Value> {
    let url = ctx
        .message
        .content
        .split_whitespace()
        .find(|word| word.contains("teamwork.com"));

    match url {
        Some(url) => {
            ctx.bot
                .dispatch((
                    "PLAN",
                    json!({
                        "tasklist": url,
                        "requested_by": ctx.message.author,
                    }),
                ))
                .await?;
            Ok(json!("planned"))
        }
        None => {
            if let Some(reply) = ctx.message.reply("Uh oh, I don't recognize that tasklist!") {
                ctx.bot.send(reply).await?;
            }
            Ok(Value::Null)
        }
    }
}

/// Handles "@planner status": replies with the current plan state.
async fn status(ctx: RuleContext) -> BotResult<Value> {
    let state = ctx.bot.state().to_value();
    if let Some(reply) = ctx.message.reply(format!("Currently: {state}")) {
        ctx.bot.send(reply).await?;
    }
    Ok(state)
}

#[async_trait::async_trait]
impl Behavior for Planner {
    fn initial_state(&self) -> Value {
        json!({"state": "waiting"})
    }

    fn mount(&self) -> Rule {
        Rule::when(matchers::mention("planner"))
            .name("planner")
            .child(
                Rule::when(matchers::content("plan"))
                    .name("plan")
                    .exclusive(true)
                    .run(plan),
            )
            .child(
                Rule::when(matchers::content("status"))
                    .name("status")
                    .run(status),
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
        next: &BotState,
        mutation: &Mutation,
    ) -> DispatchResult<()> {
        if mutation.kind == "PLAN" {
            let tasklist = next.value()["tasklist"].as_str().unwrap_or("?");
            if let Some(requested_by) = mutation.payload["requested_by"].as_str() {
                let confirmation = Message::outbound(
                    format!("Got it! Planning against {tasklist}."),
                    requested_by,
                );
                self.delivery
                    .send_message(confirmation)
                    .await
                    .map_err(|err| DispatchError::transition(mutation, err.to_string()))?;
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let delivery: Arc<dyn Delivery> = Arc::new(LogDelivery);
    let bot = Bot::builder(Planner::new(delivery.clone()))
        .delivery(delivery)
        .build();

    let runtime = Runtime::new(bot);
    info!(
        addr = %runtime.config().control.addr,
        "planner bot up, POST control calls to drive it"
    );
    runtime.run().await?;

    Ok(())
}
