//! Expansion of points into documents.

use crate::document::{
    Document, DocumentKind, KeyFields, DATA, IVALUE, NAME, PERIOD, SERIES, SVALUE, TAG_TIME,
    TIME, TIME_ADDED,
};
use crate::error::{CoreError, CoreResult};
use crate::mode::{MergeLabel, OutputModes};
use crate::point::TimeSeriesPoint;
use crate::time;
use crate::value::{FieldValue, NamedValue};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// A built document together with the attributes that identify it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedDocument {
    /// The document body.
    pub document: Document,
    /// Ordered key fields for identity.
    pub keys: KeyFields,
    /// The expansion that produced it.
    pub kind: DocumentKind,
}

impl KeyedDocument {
    fn new(document: Document, kind: DocumentKind, merged: bool) -> Self {
        Self {
            document,
            keys: kind.key_fields(merged),
            kind,
        }
    }
}

/// Expands points into documents according to the output modes.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    modes: OutputModes,
    merge: Option<MergeLabel>,
}

impl DocumentBuilder {
    /// Creates a builder. `merge` routes field-bearing documents of every
    /// series to one shared type.
    pub fn new(modes: OutputModes, merge: Option<MergeLabel>) -> Self {
        Self { modes, merge }
    }

    /// Returns the configured output modes.
    pub fn modes(&self) -> OutputModes {
        self.modes
    }

    /// Returns the merge label, if any.
    pub fn merge(&self) -> Option<&MergeLabel> {
        self.merge.as_ref()
    }

    /// Expands one point.
    ///
    /// A point with neither tags nor fields yields no documents. Fails if a
    /// field value cannot be stored, or if fields are present without a period;
    /// in that case none of the point's documents are returned.
    pub fn build(&self, point: &TimeSeriesPoint) -> CoreResult<Vec<KeyedDocument>> {
        let mut out = Vec::new();
        if let Some(tags) = point.present_tags() {
            self.build_tags(point, tags, &mut out);
        }
        if let Some(fields) = point.present_fields() {
            self.build_fields(point, fields, &mut out)?;
        }
        Ok(out)
    }

    /// Expands every point, stopping at the first failure.
    pub fn build_all<'a, I>(&self, points: I) -> CoreResult<Vec<KeyedDocument>>
    where
        I: IntoIterator<Item = &'a TimeSeriesPoint>,
    {
        let mut out = Vec::new();
        for point in points {
            out.extend(self.build(point)?);
        }
        Ok(out)
    }

    fn build_tags(
        &self,
        point: &TimeSeriesPoint,
        tags: &BTreeMap<String, String>,
        out: &mut Vec<KeyedDocument>,
    ) {
        let added = time::format(&point.added);
        let tag_time = time::format(&point.t);

        if self.modes.per_point() {
            let mut doc = Document::new(DocumentKind::Tags.type_name(&point.name));
            doc.insert(TIME, added.clone());
            doc.insert(TAG_TIME, tag_time.clone());
            let mut data = Vec::new();
            for (name, value) in tags {
                if self.modes.wide {
                    self.insert_wide(&mut doc, &point.name, name, value.clone().into());
                }
                if self.modes.array {
                    data.push(named_to_json(NamedValue::text(name, value)));
                }
            }
            if self.modes.array {
                doc.insert(DATA, data);
            }
            out.push(KeyedDocument::new(doc, DocumentKind::Tags, false));
        }

        if self.modes.flat {
            for (name, value) in tags {
                let mut doc = Document::new(DocumentKind::TagItem.type_name(&point.name));
                doc.insert(TIME, added.clone());
                doc.insert(TAG_TIME, tag_time.clone());
                doc.insert(NAME, name.clone());
                doc.insert(SVALUE, value.clone());
                out.push(KeyedDocument::new(doc, DocumentKind::TagItem, false));
            }
        }
    }

    fn build_fields(
        &self,
        point: &TimeSeriesPoint,
        fields: &BTreeMap<String, FieldValue>,
        out: &mut Vec<KeyedDocument>,
    ) -> CoreResult<()> {
        if !self.modes.per_point() && !self.modes.flat {
            return Ok(());
        }
        if point.period.is_empty() {
            return Err(CoreError::MissingPeriod {
                series: point.name.clone(),
            });
        }

        let merged = self.merge.is_some();
        let base = self
            .merge
            .as_ref()
            .map(MergeLabel::as_str)
            .unwrap_or(&point.name);
        let t = time::format(&point.t);
        let added = time::format(&point.added);

        let header = |kind: DocumentKind| {
            let mut doc = Document::new(kind.type_name(base));
            doc.insert(TIME, t.clone());
            doc.insert(PERIOD, point.period.clone());
            if merged {
                doc.insert(SERIES, point.name.clone());
            }
            doc.insert(TIME_ADDED, added.clone());
            doc
        };

        // Validate and stage everything first so a bad value emits nothing.
        let mut staged = Vec::new();

        if self.modes.per_point() {
            let mut doc = header(DocumentKind::Series);
            let mut data = Vec::new();
            for (name, value) in fields {
                if self.modes.wide {
                    let json = value.to_json(&point.name, name)?;
                    self.insert_wide(&mut doc, &point.name, name, json);
                }
                if self.modes.array {
                    data.push(named_to_json(NamedValue::from_value(
                        &point.name,
                        name,
                        value,
                    )?));
                }
            }
            if self.modes.array {
                doc.insert(DATA, data);
            }
            staged.push(KeyedDocument::new(doc, DocumentKind::Series, merged));
        }

        if self.modes.flat {
            for (name, value) in fields {
                let mut doc = header(DocumentKind::SeriesItem);
                doc.insert(NAME, name.clone());
                match value.as_text() {
                    Some(text) => doc.insert(SVALUE, text.to_string()),
                    None => {
                        let named = NamedValue::from_value(&point.name, name, value)?;
                        doc.insert(IVALUE, named.numeric_value);
                    }
                }
                staged.push(KeyedDocument::new(doc, DocumentKind::SeriesItem, merged));
            }
        }

        out.extend(staged);
        Ok(())
    }

    /// Stores a wide attribute unless it would replace one the document owns.
    fn insert_wide(&self, doc: &mut Document, series: &str, name: &str, value: Value) {
        let claimed: &[&str] = if self.modes.array { &[DATA] } else { &[] };
        if !doc.insert_wide(name, value, claimed) {
            warn!(
                series,
                attribute = name,
                doc_type = doc.doc_type(),
                "wide attribute clashes with a document attribute, skipped"
            );
        }
    }
}

fn named_to_json(named: NamedValue) -> serde_json::Value {
    let mut entry = serde_json::Map::new();
    entry.insert(NAME.to_string(), named.name.into());
    entry.insert(IVALUE.to_string(), named.numeric_value.into());
    entry.insert(SVALUE.to_string(), named.string_value.into());
    serde_json::Value::Object(entry)
}
