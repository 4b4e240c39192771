//! Bot state values.
//!
//! A bot's state is an opaque, application-defined JSON value owned by one
//! bot instance. The framework never mutates it in place: every successful
//! dispatch replaces it wholesale, and reducers signal "nothing changed" by
//! returning the state they were given.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

/// A shared, immutable snapshot of a bot's state.
///
/// `BotState` is cheap to clone. Two values are *identical* when they share
/// the same allocation ([`same_as`](Self::same_as)), which is how the engine
/// short-circuits no-op dispatches. A reducer that wants a no-op returns a
/// clone of its input; one that wants a change builds a new value with
/// [`BotState::new`].
#[derive(Debug, Clone)]
pub struct BotState(Arc<Value>);

impl BotState {
    /// Wraps a fresh state value.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Returns true when both states are the same allocation.
    ///
    /// This is identity, not structural equality: two separately-built but
    /// deep-equal values are *not* the same state.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the underlying JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Deep-copies the underlying value, e.g. for a snapshot.
    pub fn to_value(&self) -> Value {
        self.0.as_ref().clone()
    }
}

impl Default for BotState {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl Deref for BotState {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Value> for BotState {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_identity() {
        let state = BotState::new(json!({"n": 1}));
        let copy = state.clone();
        assert!(state.same_as(&copy));
    }

    #[test]
    fn equal_values_are_not_identical() {
        let a = BotState::new(json!({"n": 1}));
        let b = BotState::new(json!({"n": 1}));
        assert_eq!(a.value(), b.value());
        assert!(!a.same_as(&b));
    }
}
