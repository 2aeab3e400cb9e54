//! Paired delete/insert batches.

use crate::error::SyncResult;
use seriesdoc_core::{identity, DocumentId, KeyedDocument};
use seriesdoc_sync_protocol::{BulkAction, BulkRequest};

/// Delete and insert batches for one write.
///
/// Every document added contributes one delete and one insert for the same
/// identity, at the same position in both batches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkBatches {
    index: String,
    deletes: BulkRequest,
    inserts: BulkRequest,
}

impl BulkBatches {
    /// Creates empty batches targeting `index`.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            deletes: BulkRequest::new(),
            inserts: BulkRequest::new(),
        }
    }

    /// Adds a document, returning its identity.
    pub fn add(&mut self, keyed: KeyedDocument) -> SyncResult<DocumentId> {
        let id = identity(&keyed.document, keyed.keys)?;
        self.deletes
            .push(BulkAction::delete(self.index.as_str(), id.clone()));
        self.inserts
            .push(BulkAction::index(self.index.as_str(), id.clone(), keyed.document));
        Ok(id)
    }

    /// Number of documents added.
    pub fn len(&self) -> usize {
        self.inserts.len()
    }

    /// True when no document was added.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
    }

    /// Target index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// The delete batch.
    pub fn deletes(&self) -> &BulkRequest {
        &self.deletes
    }

    /// The insert batch.
    pub fn inserts(&self) -> &BulkRequest {
        &self.inserts
    }
}
