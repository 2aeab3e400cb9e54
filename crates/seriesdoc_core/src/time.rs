//! Timestamp formatting shared by documents and the index mapping.
//!
//! Timestamps are UTC wall-clock values rendered as `yyyy-MM-dd HH:mm:ss`,
//! which is the date format declared for `time` in the index settings.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDateTime;

/// `chrono` format string for document timestamps.
pub const DOC_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The same format in the document store's mapping syntax.
pub const MAPPING_DATE_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Renders a timestamp for storage in a document.
pub fn format(ts: &NaiveDateTime) -> String {
    ts.format(DOC_DATE_FORMAT).to_string()
}

/// Parses a document timestamp.
///
/// Accepts the document format and, for convenience on input files, the
/// ISO-8601 `T` separated form with optional fractional seconds.
pub fn parse(input: &str) -> CoreResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, DOC_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| CoreError::InvalidTimestamp {
            input: input.to_string(),
            message: e.to_string(),
        })
}

/// Serde adapter for `NaiveDateTime` fields using the document format.
pub mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as `yyyy-MM-dd HH:mm:ss`.
    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format(ts))
    }

    /// Deserializes from the document format or ISO-8601.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}
