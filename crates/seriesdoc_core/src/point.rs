//! Time-series points consumed by the builder.

use crate::time::serde_format;
use crate::value::FieldValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single time-series point.
///
/// `tags` and `fields` are independent; either, both or neither may be set.
/// Both are ordered by name so expansion is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Series name.
    pub name: String,
    /// String tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    /// Numeric or text fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, FieldValue>>,
    /// Logical time of the point.
    #[serde(with = "serde_format")]
    pub t: NaiveDateTime,
    /// When the point was produced.
    #[serde(with = "serde_format")]
    pub added: NaiveDateTime,
    /// Aggregation period label. Required when `fields` is set.
    #[serde(default)]
    pub period: String,
}

impl TimeSeriesPoint {
    /// Creates a point with neither tags nor fields.
    pub fn new(name: impl Into<String>, t: NaiveDateTime, added: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            tags: None,
            fields: None,
            t,
            added,
            period: String::new(),
        }
    }

    /// Sets the aggregation period.
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    /// Adds one tag.
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Adds one field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Returns the tags if at least one is present.
    pub fn present_tags(&self) -> Option<&BTreeMap<String, String>> {
        self.tags.as_ref().filter(|t| !t.is_empty())
    }

    /// Returns the fields if at least one is present.
    pub fn present_fields(&self) -> Option<&BTreeMap<String, FieldValue>> {
        self.fields.as_ref().filter(|f| !f.is_empty())
    }
}
