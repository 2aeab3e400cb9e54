//! Delete-then-insert execution of bulk batches.

use crate::batch::BulkBatches;
use crate::config::DeleteFailurePolicy;
use crate::error::{BulkPhase, ItemFailure, SyncError, SyncResult};
use crate::store::DocumentStore;
use seriesdoc_sync_protocol::{BulkRequest, BulkResponse};
use tracing::{debug, warn};

/// Outcome of executing one pair of batches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteReport {
    /// Previous versions removed.
    pub deleted: usize,
    /// Deletes that found no previous version.
    pub not_found: usize,
    /// True when the delete phase was skipped because the index had nothing
    /// searchable yet.
    pub delete_skipped: bool,
    /// Deletes resubmitted after a failure.
    pub retried_deletes: usize,
    /// Documents written.
    pub inserted: usize,
}

/// Runs the delete batch, then the insert batch, against a store.
pub struct BatchExecutor<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    policy: DeleteFailurePolicy,
    verbose: bool,
}

impl<'a, S: DocumentStore + ?Sized> BatchExecutor<'a, S> {
    /// Creates an executor.
    pub fn new(store: &'a S, policy: DeleteFailurePolicy) -> Self {
        Self {
            store,
            policy,
            verbose: false,
        }
    }

    /// Logs every failed item, not only the counts.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Executes both phases. Nothing is submitted for empty batches.
    ///
    /// The insert phase only starts after the delete phase succeeded, so a
    /// failed delete leaves the previous versions in place.
    pub fn execute(&self, batches: &BulkBatches) -> SyncResult<ExecuteReport> {
        let mut report = ExecuteReport::default();
        if batches.is_empty() {
            return Ok(report);
        }

        self.delete_phase(batches.deletes(), &mut report)?;
        self.insert_phase(batches.inserts(), &mut report)?;

        debug!(
            index = batches.index(),
            deleted = report.deleted,
            not_found = report.not_found,
            inserted = report.inserted,
            "bulk batches executed"
        );
        Ok(report)
    }

    fn delete_phase(&self, request: &BulkRequest, report: &mut ExecuteReport) -> SyncResult<()> {
        let resp = match self.store.bulk(request) {
            Ok(resp) => resp,
            Err(e) if e.store_cause().is_some_and(|c| c.is_search_phase()) => {
                debug!(actions = request.len(), "nothing searchable yet, skipping deletes");
                report.delete_skipped = true;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let failed = self.classify_deletes(request, &resp, None, report)?;
        if failed.is_empty() {
            return Ok(());
        }

        match self.policy {
            DeleteFailurePolicy::Fatal => Err(self.item_failures(BulkPhase::Delete, failed)),
            DeleteFailurePolicy::RetryOnce => {
                let positions: Vec<usize> = failed.iter().map(|f| f.position).collect();
                let retry = request.select(&positions);
                report.retried_deletes += retry.len();
                debug!(actions = retry.len(), "retrying failed deletes");

                let resp = self.store.bulk(&retry)?;
                let still_failed = self.classify_deletes(&retry, &resp, Some(&positions), report)?;
                if still_failed.is_empty() {
                    Ok(())
                } else {
                    Err(self.item_failures(BulkPhase::Delete, still_failed))
                }
            }
        }
    }

    /// Counts deleted and not-found items and returns the remaining failures.
    ///
    /// `origin` maps positions of a resubmitted request back to the batch.
    fn classify_deletes(
        &self,
        request: &BulkRequest,
        resp: &BulkResponse,
        origin: Option<&[usize]>,
        report: &mut ExecuteReport,
    ) -> SyncResult<Vec<ItemFailure>> {
        check_executed(BulkPhase::Delete, request, resp)?;

        let mut failures = Vec::new();
        for (pos, item) in resp.items.iter().enumerate() {
            if !item.is_failure() {
                report.deleted += 1;
            } else if item.is_not_found() {
                report.not_found += 1;
            } else {
                let position = origin.and_then(|o| o.get(pos).copied()).unwrap_or(pos);
                failures.push(failure(request, resp, pos, position));
            }
        }
        Ok(failures)
    }

    fn insert_phase(&self, request: &BulkRequest, report: &mut ExecuteReport) -> SyncResult<()> {
        let resp = self.store.bulk(request)?;
        check_executed(BulkPhase::Insert, request, &resp)?;

        let failures: Vec<ItemFailure> = resp
            .failed()
            .map(|(pos, _)| failure(request, &resp, pos, pos))
            .collect();
        if !failures.is_empty() {
            return Err(self.item_failures(BulkPhase::Insert, failures));
        }
        report.inserted = resp.items.len();
        Ok(())
    }

    fn item_failures(&self, phase: BulkPhase, failures: Vec<ItemFailure>) -> SyncError {
        if self.verbose {
            for f in &failures {
                warn!(%phase, failure = %f, "bulk item failed");
            }
        }
        SyncError::ItemFailures { phase, failures }
    }
}

/// Every submitted action must have a result.
fn check_executed(phase: BulkPhase, request: &BulkRequest, resp: &BulkResponse) -> SyncResult<()> {
    let submitted = request.len();
    let returned = resp.items.len();
    if returned < submitted {
        return Err(SyncError::UnexecutedActions {
            phase,
            remaining: submitted - returned,
        });
    }
    if returned > submitted {
        return Err(SyncError::Protocol(format!(
            "bulk {}: {} results for {} actions",
            phase, returned, submitted
        )));
    }
    Ok(())
}

fn failure(request: &BulkRequest, resp: &BulkResponse, pos: usize, position: usize) -> ItemFailure {
    let result = resp.items[pos].result();
    let id = request
        .actions()
        .get(pos)
        .map(|a| a.id().to_string())
        .or_else(|| result.id.clone())
        .unwrap_or_default();
    ItemFailure {
        position,
        id,
        status: result.status,
        cause: result.error.clone(),
    }
}
