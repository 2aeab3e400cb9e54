//! Output-mode flags and the merge label.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which document shapes to emit. The flags are independent.
///
/// `wide` and `array` share one combined document; `flat` always yields
/// separate documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputModes {
    /// Every tag/field becomes a top-level attribute.
    pub wide: bool,
    /// Tags/fields go into an embedded `data` sequence.
    pub array: bool,
    /// One document per tag/field.
    pub flat: bool,
}

impl OutputModes {
    /// No shapes enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// All shapes enabled.
    pub fn all() -> Self {
        Self {
            wide: true,
            array: true,
            flat: true,
        }
    }

    /// Enables or disables the wide shape.
    pub fn with_wide(mut self, on: bool) -> Self {
        self.wide = on;
        self
    }

    /// Enables or disables the array shape.
    pub fn with_array(mut self, on: bool) -> Self {
        self.array = on;
        self
    }

    /// Enables or disables the flat shape.
    pub fn with_flat(mut self, on: bool) -> Self {
        self.flat = on;
        self
    }

    /// True when the combined per-point document is requested.
    pub fn per_point(&self) -> bool {
        self.wide || self.array
    }

    /// True when no shape is enabled; such a configuration emits nothing.
    pub fn is_empty(&self) -> bool {
        !(self.wide || self.array || self.flat)
    }
}

impl fmt::Display for OutputModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (self.wide, "wide"),
            (self.array, "array"),
            (self.flat, "flat"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

/// Shared document type base for field-bearing points of every series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MergeLabel(String);

impl MergeLabel {
    /// Creates a label; it must not be empty.
    pub fn new(label: impl Into<String>) -> CoreResult<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(CoreError::EmptyMergeLabel);
        }
        Ok(Self(label))
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MergeLabel {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<MergeLabel> for String {
    fn from(label: MergeLabel) -> Self {
        label.0
    }
}

impl fmt::Display for MergeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_builder() {
        let m = OutputModes::none().with_wide(true).with_flat(true);
        assert!(m.per_point());
        assert!(m.flat);
        assert!(!m.array);
        assert_eq!(m.to_string(), "wide+flat");
        assert!(OutputModes::none().is_empty());
        assert_eq!(OutputModes::none().to_string(), "none");
    }

    #[test]
    fn merge_label_rejects_empty() {
        assert!(matches!(MergeLabel::new(""), Err(CoreError::EmptyMergeLabel)));
        assert_eq!(MergeLabel::new("all").unwrap().as_str(), "all");
        let parsed: Result<MergeLabel, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }
}
