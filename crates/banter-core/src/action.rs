//! Actions, mutations, and the reducer's change recorder.
//!
//! An [`Action`] describes an intended state change and is consumed by the
//! reducer. While reducing, the reducer records zero or more [`Mutation`]s
//! through a [`Changes`] recorder; the engine later runs one transition hook
//! per mutation, in emission order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Action
// ============================================================================

/// A tagged value describing an intended state change.
///
/// Actions follow the Flux-Standard-Action shape: a `kind` tag (serialized as
/// `"type"`) plus an arbitrary JSON payload. They are ephemeral, created per
/// dispatch call and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// Arbitrary payload accompanying the action.
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Creates an action with a null payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// Attaches a payload to this action.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

impl From<&str> for Action {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for Action {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

impl From<(&str, Value)> for Action {
    fn from((kind, payload): (&str, Value)) -> Self {
        Self::new(kind).with_payload(payload)
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// One reducer-emitted sub-step of a state transition.
///
/// Mutations are consumed once by the transition step, in the order the
/// reducer emitted them, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// The mutation tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// Payload describing the sub-step.
    #[serde(default)]
    pub payload: Value,
}

// ============================================================================
// Changes
// ============================================================================

/// The recorder handed to a reducer for emitting mutations.
///
/// [`emit`](Self::emit) defaults the mutation payload to the payload of the
/// action being reduced; [`emit_with`](Self::emit_with) overrides it.
#[derive(Debug)]
pub struct Changes {
    default_payload: Value,
    emitted: Vec<Mutation>,
}

impl Changes {
    pub(crate) fn new(default_payload: Value) -> Self {
        Self {
            default_payload,
            emitted: Vec::new(),
        }
    }

    /// Emits a mutation carrying the dispatched action's payload.
    pub fn emit(&mut self, kind: impl Into<String>) {
        self.emitted.push(Mutation {
            kind: kind.into(),
            payload: self.default_payload.clone(),
        });
    }

    /// Emits a mutation with an explicit payload.
    pub fn emit_with(&mut self, kind: impl Into<String>, payload: Value) {
        self.emitted.push(Mutation {
            kind: kind.into(),
            payload,
        });
    }

    /// Returns how many mutations have been emitted so far.
    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    /// Returns true if no mutations have been emitted.
    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }

    pub(crate) fn into_mutations(self) -> Vec<Mutation> {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_serializes_kind_as_type() {
        let action = Action::new("PLAN").with_payload(json!({"tasklist": "x"}));
        let encoded = serde_json::to_value(&action).unwrap();

        assert_eq!(encoded["type"], "PLAN");
        assert_eq!(encoded["payload"]["tasklist"], "x");
    }

    #[test]
    fn emit_defaults_to_the_action_payload() {
        let mut changes = Changes::new(json!({"n": 1}));
        changes.emit("INC");
        changes.emit_with("SET", json!({"n": 5}));

        let mutations = changes.into_mutations();
        assert_eq!(mutations[0].payload, json!({"n": 1}));
        assert_eq!(mutations[1].payload, json!({"n": 5}));
    }

    #[test]
    fn emission_order_is_preserved() {
        let mut changes = Changes::new(Value::Null);
        for kind in ["a", "b", "c"] {
            changes.emit(kind);
        }

        let kinds: Vec<_> = changes
            .into_mutations()
            .into_iter()
            .map(|m| m.kind)
            .collect();
        assert_eq!(kinds, ["a", "b", "c"]);
    }
}
