//! Destination index lifecycle.

use crate::error::{SyncError, SyncResult};
use crate::store::DocumentStore;
use seriesdoc_sync_protocol::IndexSettings;
use tracing::{debug, info};

/// How `ensure_index` found the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The index already existed.
    Existing,
    /// This call created the index.
    Created,
    /// Another writer created the index between the check and the create.
    CreatedConcurrently,
}

/// Makes sure the destination index exists before documents are written.
pub struct IndexManager<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    settings: &'a IndexSettings,
}

impl<'a, S: DocumentStore + ?Sized> IndexManager<'a, S> {
    /// Creates a manager creating missing indexes with `settings`.
    pub fn new(store: &'a S, settings: &'a IndexSettings) -> Self {
        Self { store, settings }
    }

    /// Checks for the index and creates it when missing.
    ///
    /// A creation that loses a race against another writer counts as success.
    /// A creation the store does not acknowledge is an error.
    pub fn ensure_index(&self, index: &str) -> SyncResult<IndexStatus> {
        if self.store.index_exists(index)? {
            return Ok(IndexStatus::Existing);
        }

        match self.store.create_index(index, self.settings) {
            Ok(resp) if resp.acknowledged => {
                info!(index, "created index");
                Ok(IndexStatus::Created)
            }
            Ok(_) => Err(SyncError::IndexNotCreated {
                index: index.to_string(),
            }),
            Err(e) if e.store_cause().is_some_and(|c| c.is_already_exists()) => {
                debug!(index, "index created concurrently");
                Ok(IndexStatus::CreatedConcurrently)
            }
            Err(e) => Err(e),
        }
    }
}
