//! Bulk requests and their NDJSON encoding.

use crate::error::ProtocolResult;
use seriesdoc_core::{Document, DocumentId};
use serde_json::{json, Map, Value};

/// One operation inside a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction {
    /// Delete the document with this identity.
    Delete {
        /// Target index.
        index: String,
        /// Document identity.
        id: DocumentId,
    },
    /// Create or overwrite the document with this identity.
    Index {
        /// Target index.
        index: String,
        /// Document identity.
        id: DocumentId,
        /// Full document body.
        source: Map<String, Value>,
    },
}

impl BulkAction {
    /// Creates a delete action.
    pub fn delete(index: impl Into<String>, id: DocumentId) -> Self {
        BulkAction::Delete {
            index: index.into(),
            id,
        }
    }

    /// Creates an index (insert/overwrite) action.
    pub fn index(index: impl Into<String>, id: DocumentId, doc: Document) -> Self {
        BulkAction::Index {
            index: index.into(),
            id,
            source: doc.into_map(),
        }
    }

    /// Returns the target index.
    pub fn index_name(&self) -> &str {
        match self {
            BulkAction::Delete { index, .. } | BulkAction::Index { index, .. } => index,
        }
    }

    /// Returns the document identity.
    pub fn id(&self) -> &DocumentId {
        match self {
            BulkAction::Delete { id, .. } | BulkAction::Index { id, .. } => id,
        }
    }

    fn write_ndjson(&self, out: &mut Vec<u8>) -> ProtocolResult<()> {
        match self {
            BulkAction::Delete { index, id } => {
                let header = json!({ "delete": { "_index": index, "_id": id } });
                serde_json::to_writer(&mut *out, &header)?;
                out.push(b'\n');
            }
            BulkAction::Index { index, id, source } => {
                let header = json!({ "index": { "_index": index, "_id": id } });
                serde_json::to_writer(&mut *out, &header)?;
                out.push(b'\n');
                serde_json::to_writer(&mut *out, source)?;
                out.push(b'\n');
            }
        }
        Ok(())
    }
}

/// An ordered batch of bulk actions submitted in one round-trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRequest {
    actions: Vec<BulkAction>,
}

impl BulkRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action.
    pub fn push(&mut self, action: BulkAction) {
        self.actions.push(action);
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when no action is queued.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the queued actions in submission order.
    pub fn actions(&self) -> &[BulkAction] {
        &self.actions
    }

    /// Builds a request holding only the actions at the given positions.
    pub fn select(&self, positions: &[usize]) -> Self {
        Self {
            actions: positions
                .iter()
                .filter_map(|&i| self.actions.get(i).cloned())
                .collect(),
        }
    }

    /// Encodes the request as a newline-delimited JSON body.
    pub fn to_ndjson(&self) -> ProtocolResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.actions.len() * 128);
        for action in &self.actions {
            action.write_ndjson(&mut out)?;
        }
        Ok(out)
    }
}

impl FromIterator<BulkAction> for BulkRequest {
    fn from_iter<I: IntoIterator<Item = BulkAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}
