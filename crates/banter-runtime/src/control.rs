//! Control-surface adapter for a bot.
//!
//! [`BotControl`] implements the transport crate's [`ControlService`] by
//! delegating each allow-listed operation to one [`Bot`], resolved once at
//! construction.

use async_trait::async_trait;
use serde_json::Value;

use banter_core::{Action, Bot, Message};
use banter_transport::{ControlError, ControlResult, ControlService};

/// Delegates control operations to a bot.
pub struct BotControl {
    bot: Bot,
}

impl BotControl {
    /// Wraps a bot for the control surface.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn service_err(err: impl std::fmt::Display) -> ControlError {
    ControlError::Service(err.to_string())
}

#[async_trait]
impl ControlService for BotControl {
    async fn handle_message(&self, message: Message) -> ControlResult<Value> {
        let results = self
            .bot
            .handle_message(message)
            .await
            .map_err(service_err)?;
        Ok(match results {
            Some(values) => Value::Array(values),
            None => Value::Null,
        })
    }

    async fn dispatch(&self, action: Action) -> ControlResult<Value> {
        let outcome = self.bot.dispatch(action).await.map_err(service_err)?;
        Ok(outcome.map_or(Value::Null, |state| state.to_value()))
    }

    async fn push_state(&self) -> ControlResult<Value> {
        self.bot.push_state();
        Ok(Value::from(self.bot.snapshot_depth()))
    }

    async fn pop_state(&self) -> ControlResult<Value> {
        Ok(self
            .bot
            .pop_state()
            .map_or(Value::Null, |state| state.to_value()))
    }

    async fn state(&self) -> ControlResult<Value> {
        Ok(self.bot.state().to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_core::{
        Behavior, BotState, Changes, DispatchError, DispatchResult, Rule,
    };
    use banter_transport::{ControlRequest, route_call};
    use serde_json::json;

    /// Counter bot used to observe state changes through the surface.
    struct Counter;

    impl Behavior for Counter {
        fn initial_state(&self) -> Value {
            json!({"n": 0})
        }

        fn mount(&self) -> Rule {
            Rule::root()
        }

        fn reduce(
            &self,
            state: &BotState,
            action: &Action,
            changes: &mut Changes,
        ) -> DispatchResult<BotState> {
            match action.kind.as_str() {
                "INC" => {
                    changes.emit("INC");
                    let n = state.value()["n"].as_i64().unwrap_or(0);
                    Ok(BotState::new(json!({"n": n + 1})))
                }
                _ => Err(DispatchError::reduce(action, "unknown action")),
            }
        }
    }

    fn control() -> (BotControl, Bot) {
        let bot = Bot::builder(Counter).quiet().build();
        (BotControl::new(bot.clone()), bot)
    }

    fn request(body: Value) -> ControlRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn dispatch_flows_through_to_the_engine() {
        let (control, bot) = control();
        // Control-surface dispatch happens against an initialized bot.
        bot.handle_message(Message::inbound("hi", "sam")).await.unwrap();

        let committed = route_call(
            &control,
            request(json!({"method": "dispatch", "args": [{"type": "INC"}]})),
        )
        .await
        .unwrap();

        assert_eq!(committed, json!({"n": 1}));
        assert_eq!(bot.state().value(), &json!({"n": 1}));
    }

    #[tokio::test]
    async fn unknown_method_leaves_state_untouched() {
        let (control, bot) = control();
        bot.handle_message(Message::inbound("hi", "sam")).await.unwrap();

        let err = route_call(
            &control,
            request(json!({"method": "unknownFn", "args": []})),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ControlError::UnknownMethod { .. }));
        assert_eq!(bot.state().value(), &json!({"n": 0}));
    }

    #[tokio::test]
    async fn checkpoint_and_restore_round_trip() {
        let (control, bot) = control();
        bot.handle_message(Message::inbound("hi", "sam")).await.unwrap();

        route_call(&control, request(json!({"method": "push_state"})))
            .await
            .unwrap();
        route_call(
            &control,
            request(json!({"method": "dispatch", "args": [{"type": "INC"}]})),
        )
        .await
        .unwrap();

        let restored = route_call(&control, request(json!({"method": "pop_state"})))
            .await
            .unwrap();

        assert_eq!(restored, json!({"n": 0}));
        assert_eq!(bot.state().value(), &json!({"n": 0}));
    }

    #[tokio::test]
    async fn failed_dispatch_surfaces_as_a_service_error() {
        let (control, bot) = control();
        bot.handle_message(Message::inbound("hi", "sam")).await.unwrap();

        let err = route_call(
            &control,
            request(json!({"method": "dispatch", "args": [{"type": "NOPE"}]})),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ControlError::Service(_)));
    }
}
