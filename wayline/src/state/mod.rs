//! Shared run state: an ordered string-keyed map of JSON values.
//!
//! One [`State`] flows through every node of a run. Nodes take it by value and
//! hand it back, so ownership transfer between steps is explicit.
//!
//! # Example
//!
//! ```rust
//! use wayline::State;
//!
//! let mut state = State::new();
//! state.set("x", 15);
//! state.set("label", "first");
//! assert_eq!(state.get_i64("x"), Some(15));
//! assert_eq!(state.keys().collect::<Vec<_>>(), vec!["x", "label"]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key prefix reserved for engine-level conventions; nodes should not store workflow data under it.
pub const RESERVED_PREFIX: char = '_';

/// Ordered mapping from string keys to dynamically-typed values.
///
/// Insertion order is preserved. Cloning (or [`State::snapshot`]) produces a deep
/// copy that shares nothing with the original, which is what run log entries rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Map<String, Value>);

impl State {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Integer value for `key`; floats with no fractional part are accepted.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        let v = self.0.get(key)?;
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        })
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Sets `key` to `value`, replacing any previous value in place (order is kept).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Shallow upsert of every key in `update` (later keys win).
    pub fn merge(&mut self, update: Map<String, Value>) {
        for (k, v) in update {
            self.0.insert(k, v);
        }
    }

    /// Deep copy for logging; later mutation of `self` never shows up in the snapshot.
    pub fn snapshot(&self) -> State {
        self.clone()
    }

    /// Copy without keys that start with [`RESERVED_PREFIX`].
    pub fn without_reserved(&self) -> State {
        State(
            self.0
                .iter()
                .filter(|(k, _)| !k.starts_with(RESERVED_PREFIX))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for State {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<State> for Value {
    fn from(state: State) -> Self {
        Value::Object(state.0)
    }
}

/// Error when converting a non-object JSON value into [`State`].
#[derive(Debug, thiserror::Error)]
#[error("state must be a JSON object, got {0}")]
pub struct NotAnObject(&'static str);

impl TryFrom<Value> for State {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(NotAnObject("null")),
            Value::Bool(_) => Err(NotAnObject("boolean")),
            Value::Number(_) => Err(NotAnObject("number")),
            Value::String(_) => Err(NotAnObject("string")),
            Value::Array(_) => Err(NotAnObject("array")),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
