//! IGN style records.
//!
//! MaCarte attaches a flat key/value "IGN style" to every feature
//! (`getIgnStyle` / `setIgnStyle`). We keep it as an ordered JSON map so
//! that keys we don't know about survive a copy untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the label text.
pub const LABEL_KEY: &str = "labelAttribute";

/// Key holding the label font size.
pub const TEXT_SIZE_KEY: &str = "textSize";

/// A feature's IGN style. Cloning is a shallow copy of the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnStyle(Map<String, Value>);

impl IgnStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The label text, if set.
    pub fn label(&self) -> Option<&str> {
        self.get(LABEL_KEY).and_then(Value::as_str)
    }

    /// A label-like value counts only when it is truthy: empty strings,
    /// zero, `false` and `null` are treated as absent.
    fn truthy(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        })
    }

    /// This style with the label fields removed.
    pub fn without_label(&self) -> Self {
        let mut out = self.clone();
        out.remove(LABEL_KEY);
        out.remove(TEXT_SIZE_KEY);
        out
    }

    /// `source`'s appearance carried over onto `self`, keeping `self`'s
    /// label text and size. Every other key comes from `source`.
    pub fn restyled_from(&self, source: &IgnStyle) -> Self {
        let mut out = source.without_label();
        for key in [LABEL_KEY, TEXT_SIZE_KEY] {
            if let Some(v) = self.truthy(key) {
                out.set(key, v.clone());
            }
        }
        out
    }
}
