//! Documents and their type discriminators.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered list of attribute names that identify a document.
pub type KeyFields = &'static [&'static str];

pub(crate) const TYPE: &str = "type";
pub(crate) const TIME: &str = "time";
pub(crate) const TAG_TIME: &str = "tag_time";
pub(crate) const TIME_ADDED: &str = "time_added";
pub(crate) const PERIOD: &str = "period";
pub(crate) const SERIES: &str = "series";
pub(crate) const NAME: &str = "name";
pub(crate) const SVALUE: &str = "svalue";
pub(crate) const IVALUE: &str = "ivalue";
pub(crate) const DATA: &str = "data";

/// Which expansion produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// One document per point holding all tags (wide and/or array).
    Tags,
    /// One document per tag (flat).
    TagItem,
    /// One document per point holding all fields (wide and/or array).
    Series,
    /// One document per field (flat).
    SeriesItem,
}

impl DocumentKind {
    /// Prefix prepended to the series name or merge label.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Tags => "t",
            DocumentKind::TagItem => "it",
            DocumentKind::Series => "s",
            DocumentKind::SeriesItem => "is",
        }
    }

    /// The `type` attribute for a series name or merge label.
    pub fn type_name(&self, base: &str) -> String {
        format!("{}{}", self.prefix(), base)
    }

    /// Key fields for this kind. `merged` only affects field-bearing kinds.
    pub fn key_fields(&self, merged: bool) -> KeyFields {
        match (self, merged) {
            (DocumentKind::Tags, _) => &[TYPE, TAG_TIME],
            (DocumentKind::TagItem, _) => &[TYPE, TAG_TIME, NAME],
            (DocumentKind::Series, false) => &[TYPE, TIME, PERIOD],
            (DocumentKind::Series, true) => &[TYPE, TIME, PERIOD, SERIES],
            (DocumentKind::SeriesItem, false) => &[TYPE, TIME, PERIOD, NAME],
            (DocumentKind::SeriesItem, true) => &[TYPE, TIME, PERIOD, SERIES, NAME],
        }
    }
}

/// Strips characters the store reserves in attribute names.
///
/// The store addresses nested attributes with `.`, so `a.b.c` becomes `abc`.
pub fn escape_field_name(name: &str) -> String {
    name.replace('.', "")
}

/// A document: an insertion-ordered attribute map that always has a `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    attrs: Map<String, Value>,
}

impl Document {
    /// Creates a document with its `type` attribute.
    pub fn new(doc_type: impl Into<String>) -> Self {
        let mut attrs = Map::new();
        attrs.insert(TYPE.to_string(), Value::String(doc_type.into()));
        Self { attrs }
    }

    /// Sets an attribute, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Sets a wide attribute from a tag/field name.
    ///
    /// The name is escaped first. It is refused when it escapes to nothing,
    /// when the document already holds that attribute, or when it is one of
    /// `claimed`, the attributes the caller sets afterwards. Returns whether
    /// the attribute was stored.
    pub fn insert_wide(&mut self, raw_name: &str, value: Value, claimed: &[&str]) -> bool {
        let name = escape_field_name(raw_name);
        if name.is_empty() || self.attrs.contains_key(&name) || claimed.contains(&name.as_str()) {
            return false;
        }
        self.attrs.insert(name, value);
        true
    }

    /// Returns an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Returns the `type` attribute.
    pub fn doc_type(&self) -> &str {
        self.attrs
            .get(TYPE)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// A document always holds at least `type`.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterates attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attrs.iter()
    }

    /// Borrows the attribute map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.attrs
    }

    /// Consumes the document into its attribute map.
    pub fn into_map(self) -> Map<String, Value> {
        self.attrs
    }
}
