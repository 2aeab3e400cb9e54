//! Document store abstraction.

use crate::error::SyncResult;
use seriesdoc_sync_protocol::{
    BulkRequest, BulkResponse, ClusterInfo, CreateIndexResponse, DeleteByQueryResponse,
    IndexSettings, Query,
};

/// A document store handles communication with the destination backend.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, in-memory for testing, etc.). Every call blocks
/// until the store answers; deadlines belong to the implementation.
///
/// A rejection of a whole request is reported as `SyncError::Store` so
/// callers can inspect the cause. Per-item outcomes of a bulk request are
/// returned in the `BulkResponse`, not as errors.
pub trait DocumentStore: Send + Sync {
    /// Checks reachability and returns version details.
    fn ping(&self) -> SyncResult<ClusterInfo>;

    /// Checks whether an index exists.
    fn index_exists(&self, index: &str) -> SyncResult<bool>;

    /// Creates an index with the given settings.
    fn create_index(&self, index: &str, settings: &IndexSettings)
        -> SyncResult<CreateIndexResponse>;

    /// Submits a bulk request.
    fn bulk(&self, request: &BulkRequest) -> SyncResult<BulkResponse>;

    /// Deletes every document of an index matching a query.
    fn delete_by_query(&self, index: &str, query: &Query) -> SyncResult<DeleteByQueryResponse>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn ping(&self) -> SyncResult<ClusterInfo> {
        (**self).ping()
    }

    fn index_exists(&self, index: &str) -> SyncResult<bool> {
        (**self).index_exists(index)
    }

    fn create_index(
        &self,
        index: &str,
        settings: &IndexSettings,
    ) -> SyncResult<CreateIndexResponse> {
        (**self).create_index(index, settings)
    }

    fn bulk(&self, request: &BulkRequest) -> SyncResult<BulkResponse> {
        (**self).bulk(request)
    }

    fn delete_by_query(&self, index: &str, query: &Query) -> SyncResult<DeleteByQueryResponse> {
        (**self).delete_by_query(index, query)
    }
}
