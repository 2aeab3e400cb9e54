//! Content-derived document identity.

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write};

const KEY_SEPARATOR: u8 = 0x1f;
const FIELD_SEPARATOR: u8 = 0x1e;

/// A document identifier: lowercase hex SHA-256 of the key fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes a document's identity from the named key fields, in order.
///
/// Each key contributes its name and the JSON encoding of its value, so
/// `{"a": "1"}` and `{"a": 1}` hash differently. Attributes not named in
/// `keys` never affect the result.
pub fn identity(doc: &Document, keys: &[&str]) -> CoreResult<DocumentId> {
    let mut hasher = Sha256::new();
    for key in keys {
        let value = doc.get(key).ok_or_else(|| CoreError::MissingKeyField {
            field: (*key).to_string(),
            doc_type: doc.doc_type().to_string(),
        })?;
        hasher.update(key.as_bytes());
        hasher.update([KEY_SEPARATOR]);
        hasher.update(serde_json::to_vec(value)?);
        hasher.update([FIELD_SEPARATOR]);
    }

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail.
        let _ = write!(hex, "{:02x}", byte);
    }
    Ok(DocumentId(hex))
}
