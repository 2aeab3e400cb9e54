//! Plan command implementation.
//!
//! Builds the bulk requests a sync would submit and prints them as NDJSON,
//! without contacting a store.

use crate::error::CliError;
use seriesdoc_core::TimeSeriesPoint;
use seriesdoc_sync_engine::{MemoryStore, SyncConfig, SyncEngine};
use std::io::Write;

/// Prints the delete batch then the insert batch.
pub fn run(
    out: &mut impl Write,
    config: SyncConfig,
    points: &[TimeSeriesPoint],
) -> Result<(), CliError> {
    let engine = SyncEngine::new(config, MemoryStore::new());
    let batches = engine.plan(points)?;

    writeln!(
        out,
        "# index {}: {} point(s), {} document(s)",
        batches.index(),
        points.len(),
        batches.len()
    )?;
    writeln!(out, "# POST /_bulk (delete)")?;
    out.write_all(&batches.deletes().to_ndjson()?)?;
    writeln!(out, "# POST /_bulk (insert)")?;
    out.write_all(&batches.inserts().to_ndjson()?)?;
    Ok(())
}
