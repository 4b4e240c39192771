//! Bot harness.
//!
//! Wires a bot to a [`CapturingDelivery`] and quiets its routing traces, so
//! a test can feed messages in and assert on what came out. The
//! [`Checkpoint`] guard wraps the bot's snapshot stack for speculative
//! runs: state is restored when the guard drops.

use std::sync::Arc;

use serde_json::Value;

use banter_core::{Behavior, Bot, BotResult, Message};

use crate::capture::CapturingDelivery;

/// A bot under test.
pub struct BotHarness {
    bot: Bot,
    delivery: Arc<CapturingDelivery>,
}

impl BotHarness {
    /// Builds a harnessed bot around the given behavior.
    pub fn new(behavior: impl Behavior) -> Self {
        let delivery = Arc::new(CapturingDelivery::new());
        let bot = Bot::builder(behavior)
            .delivery(delivery.clone())
            .quiet()
            .build();
        Self { bot, delivery }
    }

    /// The bot itself.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// The captured outbound messages.
    pub fn delivery(&self) -> &CapturingDelivery {
        &self.delivery
    }

    /// Feeds one inbound message from `author`.
    pub async fn say(&self, content: &str, author: &str) -> BotResult<Option<Vec<Value>>> {
        self.bot
            .handle_message(Message::inbound(content, author))
            .await
    }

    /// Checkpoints the bot's state until the returned guard drops.
    pub fn checkpoint(&self) -> Checkpoint<'_> {
        Checkpoint::new(&self.bot)
    }
}

/// Restores the checkpointed state when dropped.
pub struct Checkpoint<'a> {
    bot: &'a Bot,
}

impl<'a> Checkpoint<'a> {
    /// Pushes the current state and arms the restore.
    pub fn new(bot: &'a Bot) -> Self {
        bot.push_state();
        Self { bot }
    }
}

impl Drop for Checkpoint<'_> {
    fn drop(&mut self) {
        self.bot.pop_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_core::{
        Action, BotState, Changes, DispatchResult, Rule, RuleContext, matchers,
    };
    use serde_json::json;

    /// Greets on mention; `GREET` counts how many greetings went out.
    struct Greeter;

    impl Behavior for Greeter {
        fn initial_state(&self) -> Value {
            json!({"greeted": 0})
        }

        fn mount(&self) -> Rule {
            Rule::when(matchers::mention("greeter")).run(|ctx: RuleContext| async move {
                ctx.bot.dispatch("GREET").await?;
                let reply = ctx
                    .message
                    .reply("hello!")
                    .expect("inbound messages carry an author");
                ctx.bot.send(reply).await?;
                Ok(Value::Null)
            })
        }

        fn reduce(
            &self,
            state: &BotState,
            action: &Action,
            changes: &mut Changes,
        ) -> DispatchResult<BotState> {
            match action.kind.as_str() {
                "GREET" => {
                    changes.emit("GREET");
                    let n = state.value()["greeted"].as_i64().unwrap_or(0);
                    Ok(BotState::new(json!({"greeted": n + 1})))
                }
                _ => Ok(state.clone()),
            }
        }
    }

    #[tokio::test]
    async fn captures_what_the_bot_says() {
        let harness = BotHarness::new(Greeter);

        harness.say("@greeter hi", "sam").await.unwrap();

        harness
            .delivery()
            .expect_last(&Message::outbound("hello!", "sam"))
            .unwrap();
        assert_eq!(harness.bot().state().value()["greeted"], 1);
    }

    #[tokio::test]
    async fn checkpoint_restores_state_after_a_speculative_run() {
        let harness = BotHarness::new(Greeter);
        harness.say("@greeter hi", "sam").await.unwrap();

        {
            let _checkpoint = harness.checkpoint();
            harness.say("@greeter hi again", "sam").await.unwrap();
            assert_eq!(harness.bot().state().value()["greeted"], 2);
        }

        assert_eq!(harness.bot().state().value()["greeted"], 1);
    }
}
