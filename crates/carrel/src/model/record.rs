//! Source records and metadata values.
//!
//! A [`SourceRecord`] is whatever the data collaborator hands the viewer: an
//! arbitrary JSON document. Metadata copied out of a record is held as a
//! [`MetaValue`], which renderers only ever read as display text.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque, caller-provided record of arbitrary shape.
///
/// Objects expose their fields through [`get`](Self::get) and
/// [`fields`](Self::fields). Any other JSON value is accepted too: a bare
/// string is treated as a title, everything else as a record with no fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord(Value);

impl SourceRecord {
    /// Wraps a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the record, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a top-level field. Returns `None` for non-object records.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(key))
    }

    /// Iterates over top-level fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .as_object()
            .into_iter()
            .flat_map(|fields| fields.iter())
            .map(|(key, value)| (key.as_str(), value))
    }

    /// The record's text when the record itself is a bare string.
    pub fn as_text(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl From<Value> for SourceRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A read-only metadata value attached to a display item.
///
/// Renderers look values up by key and coerce them to text with
/// [`MetaValue::display`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetaValue {
    /// No data.
    #[default]
    None,
    /// String data.
    String(String),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Boolean data.
    Bool(bool),
    /// A list of values.
    List(Vec<MetaValue>),
    /// A nested table of values.
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Returns `true` if this is `MetaValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, MetaValue::None)
    }

    /// Attempts to get the data as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the data as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the data as a float. Integers convert.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetaValue::Float(n) => Some(*n),
            MetaValue::Int(n) => Some(*n as f64),
            MetaValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Attempts to get the data as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Coerces the value to display text.
    ///
    /// `None` becomes the empty string, lists are joined with `", "`, and
    /// tables render as `key: value` pairs.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::None => Ok(()),
            MetaValue::String(s) => f.write_str(s),
            MetaValue::Int(n) => write!(f, "{n}"),
            MetaValue::Float(n) => write!(f, "{n}"),
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::List(values) => {
                let mut first = true;
                for value in values.iter().filter(|v| !v.is_none()) {
                    if !first {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                    first = false;
                }
                Ok(())
            }
            MetaValue::Map(entries) => {
                let mut first = true;
                for (key, value) in entries {
                    if !first {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl From<&Value> for MetaValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => MetaValue::None,
            Value::Bool(b) => MetaValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Int(i),
                None => n.as_f64().map_or(MetaValue::None, MetaValue::Float),
            },
            Value::String(s) => MetaValue::String(s.clone()),
            Value::Array(values) => MetaValue::List(values.iter().map(MetaValue::from).collect()),
            Value::Object(fields) => MetaValue::Map(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), MetaValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Int(n)
    }
}

impl From<i32> for MetaValue {
    fn from(n: i32) -> Self {
        MetaValue::Int(n as i64)
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        MetaValue::Float(n)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_fields_of_object() {
        let record = SourceRecord::from(json!({ "title": "Algebra", "level": 2 }));
        assert_eq!(record.get("title"), Some(&json!("Algebra")));
        let keys: Vec<_> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["level", "title"]);
    }

    #[test]
    fn test_non_object_record_has_no_fields() {
        let record = SourceRecord::from(json!(42));
        assert_eq!(record.get("title"), None);
        assert_eq!(record.fields().count(), 0);

        let text = SourceRecord::from(json!("Geometry"));
        assert_eq!(text.as_text(), Some("Geometry"));
    }

    #[test]
    fn test_meta_value_display_coercion() {
        assert_eq!(MetaValue::None.display(), "");
        assert_eq!(MetaValue::from(4.5).display(), "4.5");
        assert_eq!(MetaValue::from(12).display(), "12");
        assert_eq!(MetaValue::from(true).display(), "true");

        let list = MetaValue::from(&json!(["math", null, "physics"]));
        assert_eq!(list.display(), "math, physics");

        let map = MetaValue::from(&json!({ "a": 1, "b": "two" }));
        assert_eq!(map.display(), "a: 1, b: two");
    }

    #[test]
    fn test_meta_value_numeric_access() {
        assert_eq!(MetaValue::from(3).as_float(), Some(3.0));
        assert_eq!(MetaValue::from(" 4.8 ").as_float(), Some(4.8));
        assert_eq!(MetaValue::from("n/a").as_float(), None);
        assert_eq!(MetaValue::from(&json!(7)).as_int(), Some(7));
    }
}
