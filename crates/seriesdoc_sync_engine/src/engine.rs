//! The sync engine orchestrating build, index lifecycle and bulk execution.

use crate::batch::BulkBatches;
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::executor::{BatchExecutor, ExecuteReport};
use crate::index::{IndexManager, IndexStatus};
use crate::store::DocumentStore;
use parking_lot::RwLock;
use seriesdoc_core::{DocumentBuilder, TimeSeriesPoint};
use seriesdoc_sync_protocol::{ClusterInfo, Query};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Statistics about writes made through an engine.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Number of `write_points` calls, successful or not.
    pub calls: u64,
    /// Points submitted across all calls.
    pub points: u64,
    /// Documents inserted.
    pub documents_written: u64,
    /// Previous versions removed.
    pub documents_deleted: u64,
    /// Deletes tolerated because no previous version existed.
    pub deletes_not_found: u64,
    /// Failed calls.
    pub failures: u64,
    /// Failed calls whose points could not be turned into documents.
    pub rejected: u64,
    /// Last successful write.
    pub last_write_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Result of one `write_points` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// Destination index.
    pub index: String,
    /// Points received.
    pub points: usize,
    /// Documents built from them.
    pub documents: usize,
    /// How the destination index was found, `None` when nothing was sent.
    pub index_status: Option<IndexStatus>,
    /// Outcome of the delete and insert phases.
    pub execution: ExecuteReport,
}

/// Writes time-series points to a document store.
///
/// Each `write_points` call builds every document first, so a data error
/// leaves the store untouched. It then makes sure the destination index
/// exists and runs the delete batch followed by the insert batch.
pub struct SyncEngine<S: DocumentStore> {
    config: SyncConfig,
    store: Arc<S>,
    builder: DocumentBuilder,
    stats: RwLock<SyncStats>,
}

impl<S: DocumentStore> SyncEngine<S> {
    /// Creates a new sync engine.
    pub fn new(config: SyncConfig, store: S) -> Self {
        Self::from_arc(config, Arc::new(store))
    }

    /// Creates a sync engine over a shared store.
    pub fn from_arc(config: SyncConfig, store: Arc<S>) -> Self {
        let builder = DocumentBuilder::new(config.modes, config.merge.clone());
        Self {
            config,
            store,
            builder,
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Checks reachability and returns the store's version details.
    pub fn ping(&self) -> SyncResult<ClusterInfo> {
        let info = self.store.ping()?;
        debug!(version = %info.version.number, "store reachable");
        Ok(info)
    }

    /// Builds the delete and insert batches for `points` without sending them.
    pub fn plan(&self, points: &[TimeSeriesPoint]) -> SyncResult<BulkBatches> {
        let mut batches = BulkBatches::new(self.config.index_name());
        for point in points {
            if self.config.debug > 0 {
                debug!(?point, "building point");
            }
            for keyed in self.builder.build(point)? {
                batches.add(keyed)?;
            }
        }
        debug!(
            points = points.len(),
            documents = batches.len(),
            modes = %self.config.modes,
            "planned bulk batches"
        );
        Ok(batches)
    }

    /// Writes points idempotently: previous versions of every built document
    /// are deleted, then the new versions inserted.
    ///
    /// An empty slice is a no-op that does not contact the store.
    pub fn write_points(&self, points: &[TimeSeriesPoint]) -> SyncResult<WriteReport> {
        let index = self.config.index_name();
        if points.is_empty() {
            debug!(%index, "no points to write");
            return Ok(WriteReport {
                index,
                points: 0,
                documents: 0,
                index_status: None,
                execution: ExecuteReport::default(),
            });
        }

        let result = self.write_batches(&index, points);
        self.record(points.len(), &result);
        result
    }

    fn write_batches(&self, index: &str, points: &[TimeSeriesPoint]) -> SyncResult<WriteReport> {
        let batches = self.plan(points)?;

        let status = IndexManager::new(&*self.store, &self.config.index_settings)
            .ensure_index(index)?;

        let execution = BatchExecutor::new(&*self.store, self.config.delete_policy)
            .with_verbose(self.config.debug > 0)
            .execute(&batches)?;

        info!(
            index,
            points = points.len(),
            documents = batches.len(),
            "points written"
        );
        Ok(WriteReport {
            index: index.to_string(),
            points: points.len(),
            documents: batches.len(),
            index_status: Some(status),
            execution,
        })
    }

    fn record(&self, points: usize, result: &SyncResult<WriteReport>) {
        let mut stats = self.stats.write();
        stats.calls += 1;
        stats.points += points as u64;
        match result {
            Ok(report) => {
                stats.documents_written += report.execution.inserted as u64;
                stats.documents_deleted += report.execution.deleted as u64;
                stats.deletes_not_found += report.execution.not_found as u64;
                stats.last_write_time = Some(Instant::now());
            }
            Err(e) if e.is_data_error() => {
                warn!(error = %e, "points rejected");
                stats.failures += 1;
                stats.rejected += 1;
                stats.last_error = Some(e.to_string());
            }
            Err(e) => {
                warn!(error = %e, "write failed");
                stats.failures += 1;
                stats.last_error = Some(e.to_string());
            }
        }
    }

    /// Deletes every document whose attributes equal all the given values.
    ///
    /// Returns the number of documents deleted. An index with nothing
    /// searchable yet counts as zero deletions.
    pub fn delete_by_query(&self, terms: &[(&str, Value)]) -> SyncResult<u64> {
        let query = Query::terms(terms.iter().map(|(k, v)| (*k, v.clone())));
        self.run_query(&query)
    }

    /// Deletes every document whose `field` matches a `*`/`?` pattern.
    pub fn delete_by_wildcard(&self, field: &str, pattern: &str) -> SyncResult<u64> {
        self.run_query(&Query::wildcard(field, pattern))
    }

    fn run_query(&self, query: &Query) -> SyncResult<u64> {
        let index = self.config.index_name();
        match self.store.delete_by_query(&index, query) {
            Ok(resp) => {
                if self.config.debug > 0 {
                    debug!(%index, ?query, deleted = resp.deleted, "delete by query");
                }
                Ok(resp.deleted)
            }
            Err(e) if e.store_cause().is_some_and(|c| c.is_search_phase()) => {
                debug!(%index, "index not searchable yet, nothing to delete");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}
