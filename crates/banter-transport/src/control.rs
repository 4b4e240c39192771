//! The control-call protocol.
//!
//! A control request is `{"method": "...", "args": [...]}`. The method is
//! resolved against a fixed allow-list (the operations of the
//! [`ControlService`] trait) and its arguments are deserialized
//! positionally. Nothing reaches the service until the method and its
//! arguments have validated.
//!
//! Responses are `{"data": <result>}` on success, or
//! `{"error": true, "meta": {"message": ..., "stack": ...}}` on any failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use banter_core::{Action, Message};

use crate::error::{ControlError, ControlResult};

/// The wire shape of a control request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlRequest {
    /// The operation to invoke.
    #[serde(default)]
    pub method: Option<String>,

    /// Positional arguments for the operation.
    #[serde(default)]
    pub args: Vec<Value>,
}

/// The fixed set of operations a bot exposes over the control surface.
///
/// This is the delegation boundary: the HTTP layer validates and parses,
/// then calls exactly one of these. Implementations delegate to a bot
/// resolved once at construction.
#[async_trait]
pub trait ControlService: Send + Sync {
    /// Routes one inbound message through the bot.
    async fn handle_message(&self, message: Message) -> ControlResult<Value>;

    /// Dispatches one action through the bot's engine.
    async fn dispatch(&self, action: Action) -> ControlResult<Value>;

    /// Checkpoints the bot's live state.
    async fn push_state(&self) -> ControlResult<Value>;

    /// Restores the most recent checkpoint.
    async fn pop_state(&self) -> ControlResult<Value>;

    /// Returns a read-only copy of the live state.
    async fn state(&self) -> ControlResult<Value>;
}

/// Resolves and runs one validated control request.
///
/// Unknown or missing methods fail here, before the service sees anything.
pub async fn route_call(
    service: &dyn ControlService,
    request: ControlRequest,
) -> ControlResult<Value> {
    let method = request.method.ok_or(ControlError::MethodMissing)?;
    let mut args = request.args.into_iter();

    match method.as_str() {
        "handle_message" => {
            let message = required_arg(&mut args, &method)?;
            service.handle_message(message).await
        }
        "dispatch" => {
            let action = required_arg(&mut args, &method)?;
            service.dispatch(action).await
        }
        "push_state" => service.push_state().await,
        "pop_state" => service.pop_state().await,
        "state" => service.state().await,
        _ => Err(ControlError::UnknownMethod { method }),
    }
}

/// Deserializes the next positional argument for `method`.
fn required_arg<T: serde::de::DeserializeOwned>(
    args: &mut std::vec::IntoIter<Value>,
    method: &str,
) -> ControlResult<T> {
    let value = args.next().ok_or_else(|| ControlError::BadArgs {
        method: method.to_string(),
        reason: "missing argument".to_string(),
    })?;
    serde_json::from_value(value).map_err(|err| ControlError::BadArgs {
        method: method.to_string(),
        reason: err.to_string(),
    })
}

/// Builds the success envelope.
pub fn success_body(data: Value) -> Value {
    json!({ "data": data })
}

/// Builds the error envelope.
///
/// `meta.message` is the human-readable description; `meta.stack` carries
/// the structured rendering of the error for diff-friendly reporting.
pub fn error_body(err: &ControlError) -> Value {
    json!({
        "error": true,
        "meta": {
            "message": err.to_string(),
            "stack": format!("{err:?}"),
        },
    })
}
