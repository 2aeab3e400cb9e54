//! Typed tag/field values and the embedded name/value record.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value carried by a point's field set.
///
/// Text values are stored as strings. Every other variant must coerce to a
/// finite `f64` to be stored; booleans and non-finite floats do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// UTF-8 text.
    Text(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean. Never coercible to a number.
    Boolean(bool),
}

impl FieldValue {
    /// Returns the text if this value is natively a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces a non-text value to a finite float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    /// Coerces the value to a finite float, failing for text, booleans and
    /// non-finite floats.
    ///
    /// `series` and `field` only label the error.
    pub fn coerce(&self, series: &str, field: &str) -> CoreResult<f64> {
        self.as_number()
            .ok_or_else(|| self.not_numeric(series, field))
    }

    /// Converts the value into a JSON attribute value.
    ///
    /// `series` and `field` only label the error.
    pub fn to_json(&self, series: &str, field: &str) -> CoreResult<serde_json::Value> {
        match self {
            FieldValue::Text(s) => Ok(serde_json::Value::String(s.clone())),
            FieldValue::Integer(i) => Ok(serde_json::Value::from(*i)),
            other => {
                let n = other.coerce(series, field)?;
                serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| other.not_numeric(series, field))
            }
        }
    }

    fn not_numeric(&self, series: &str, field: &str) -> CoreError {
        CoreError::NotNumeric {
            series: series.to_string(),
            field: field.to_string(),
            value: format!("{:?}", self),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

/// One entry of a document's embedded `data` sequence.
///
/// Exactly one of the two values is meaningful; the other keeps its zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    /// Tag or field name (unescaped).
    pub name: String,
    /// Numeric value, 0 for text entries.
    #[serde(rename = "ivalue", default)]
    pub numeric_value: f64,
    /// Text value, empty for numeric entries.
    #[serde(rename = "svalue", default)]
    pub string_value: String,
}

impl NamedValue {
    /// Creates a text entry.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            numeric_value: 0.0,
            string_value: value.into(),
        }
    }

    /// Creates a numeric entry.
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            numeric_value: value,
            string_value: String::new(),
        }
    }

    /// Creates an entry from a field value, failing if it is neither text nor numeric.
    pub fn from_value(series: &str, name: &str, value: &FieldValue) -> CoreResult<Self> {
        if let Some(s) = value.as_text() {
            return Ok(Self::text(name, s));
        }
        value.coerce(series, name).map(|n| Self::number(name, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_untagged() {
        let v: Vec<FieldValue> = serde_json::from_str(r#"["x", 3, 2.5, true]"#).unwrap();
        assert_eq!(
            v,
            vec![
                FieldValue::Text("x".into()),
                FieldValue::Integer(3),
                FieldValue::Float(2.5),
                FieldValue::Boolean(true),
            ]
        );
    }

    #[test]
    fn coercion() {
        assert_eq!(FieldValue::Integer(7).as_number(), Some(7.0));
        assert_eq!(FieldValue::Float(0.5).as_number(), Some(0.5));
        assert_eq!(FieldValue::Float(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Boolean(false).as_number(), None);
        assert_eq!(FieldValue::Text("1".into()).as_number(), None);
    }

    #[test]
    fn coerce_labels_failures() {
        assert_eq!(FieldValue::Integer(-3).coerce("s", "f").unwrap(), -3.0);
        let err = FieldValue::Boolean(true).coerce("sprs", "merged").unwrap_err();
        match err {
            CoreError::NotNumeric { series, field, .. } => {
                assert_eq!(series, "sprs");
                assert_eq!(field, "merged");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(FieldValue::Text("1".into()).coerce("s", "f").is_err());
    }

    #[test]
    fn named_value_from_text_and_number() {
        let t = NamedValue::from_value("s", "repo", &"kubernetes".into()).unwrap();
        assert_eq!(t.string_value, "kubernetes");
        assert_eq!(t.numeric_value, 0.0);

        let n = NamedValue::from_value("s", "prs", &FieldValue::Integer(12)).unwrap();
        assert_eq!(n.numeric_value, 12.0);
        assert!(n.string_value.is_empty());
    }

    #[test]
    fn named_value_rejects_boolean() {
        let err = NamedValue::from_value("s", "flag", &FieldValue::Boolean(true)).unwrap_err();
        assert!(matches!(err, CoreError::NotNumeric { ref field, .. } if field == "flag"));
    }

    #[test]
    fn named_value_wire_names() {
        let json = serde_json::to_value(NamedValue::number("a", 1.5)).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["ivalue"], 1.5);
        assert_eq!(json["svalue"], "");
    }

    #[test]
    fn to_json_keeps_integers() {
        let v = FieldValue::Integer(4).to_json("s", "f").unwrap();
        assert_eq!(v, serde_json::json!(4));
        assert!(FieldValue::Float(f64::INFINITY).to_json("s", "f").is_err());
    }
}
