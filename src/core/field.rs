//! Typed key-value fields attached to records
//!
//! A [`Field`] is immutable once built. Typed constructors cover the
//! primitive kinds and their sequences; [`Field::any`] is the escape hatch
//! for everything else and goes through `serde_json`, so keep it off hot
//! paths.

use serde::Serialize;
use std::fmt;

/// Key used for the placeholder written when [`Field::any`] can't serialize
const CONVERSION_ERROR: &str = "FIELD_TYPE_CONVERSION_ERROR";

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Strings(Vec<String>),
    Int64s(Vec<i64>),
    Float64s(Vec<f64>),
    Bools(Vec<bool>),
    /// Opaque value, already serialized generically
    Any(serde_json::Value),
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int64(i) => write!(f, "{}", i),
            FieldValue::Float64(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Strings(v) => join(f, v),
            FieldValue::Int64s(v) => join(f, v),
            FieldValue::Float64s(v) => join(f, v),
            FieldValue::Bools(v) => join(f, v),
            FieldValue::Any(v) => write!(f, "{}", v),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        fn float(f: f64) -> serde_json::Value {
            serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)
        }

        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int64(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float64(f) => float(*f),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Strings(v) => v.iter().cloned().map(serde_json::Value::String).collect(),
            FieldValue::Int64s(v) => v.iter().map(|i| serde_json::Value::Number((*i).into())).collect(),
            FieldValue::Float64s(v) => v.iter().copied().map(float).collect(),
            FieldValue::Bools(v) => v.iter().copied().map(serde_json::Value::Bool).collect(),
            FieldValue::Any(v) => v.clone(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int64(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int64(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float64(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::Strings(v)
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(v: Vec<i64>) -> Self {
        FieldValue::Int64s(v)
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(v: Vec<f64>) -> Self {
        FieldValue::Float64s(v)
    }
}

impl From<Vec<bool>> for FieldValue {
    fn from(v: Vec<bool>) -> Self {
        FieldValue::Bools(v)
    }
}

/// An indexable key-value pair carried by a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: FieldValue,
}

impl Field {
    /// Build a field from anything convertible into a [`FieldValue`]
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn strings<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            key,
            FieldValue::Strings(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn int64s(key: impl Into<String>, values: impl Into<Vec<i64>>) -> Self {
        Self::new(key, FieldValue::Int64s(values.into()))
    }

    pub fn float64s(key: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self::new(key, FieldValue::Float64s(values.into()))
    }

    pub fn bools(key: impl Into<String>, values: impl Into<Vec<bool>>) -> Self {
        Self::new(key, FieldValue::Bools(values.into()))
    }

    /// Field for a value with no typed constructor.
    ///
    /// The value is serialized with `serde_json` up front. If that fails the
    /// field becomes `ErrField<key>: "FIELD_TYPE_CONVERSION_ERROR"`, so one
    /// bad value never costs the whole record.
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(json) => Self::new(key, FieldValue::Any(json)),
            Err(_) => Self::new(format!("ErrField{}", key), CONVERSION_ERROR),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Field::string("a", "b").value(), &FieldValue::String("b".into()));
        assert_eq!(Field::int64("n", 42).value(), &FieldValue::Int64(42));
        assert_eq!(Field::float64("f", 1.5).value(), &FieldValue::Float64(1.5));
        assert_eq!(Field::bool("ok", true).value(), &FieldValue::Bool(true));
        assert_eq!(
            Field::strings("tags", ["x", "y"]).value(),
            &FieldValue::Strings(vec!["x".into(), "y".into()])
        );
        assert_eq!(Field::int64s("ids", vec![1, 2]).value(), &FieldValue::Int64s(vec![1, 2]));
        assert_eq!(Field::bools("flags", vec![true]).key(), "flags");
    }

    #[test]
    fn test_any_serializes_generically() {
        let mut map = HashMap::new();
        map.insert("plan", "premium");
        let field = Field::any("account", &map);

        assert_eq!(field.key(), "account");
        assert_eq!(
            field.value().to_json_value(),
            serde_json::json!({ "plan": "premium" })
        );
    }

    #[test]
    fn test_any_falls_back_on_unserializable() {
        // maps with non-string keys can't become JSON objects
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        let field = Field::any("coords", &map);

        assert_eq!(field.key(), "ErrFieldcoords");
        assert_eq!(field.value(), &FieldValue::String(CONVERSION_ERROR.to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Field::int64("n", 7).to_string(), "n=7");
        assert_eq!(Field::float64s("xs", vec![1.0, 2.5]).to_string(), "xs=[1,2.5]");
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        let value = FieldValue::Float64(f64::NAN);
        assert_eq!(value.to_json_value(), serde_json::Value::Null);
    }
}
