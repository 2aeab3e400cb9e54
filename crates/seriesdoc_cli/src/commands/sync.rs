//! Sync command implementation.

use crate::client;
use crate::error::CliError;
use seriesdoc_core::TimeSeriesPoint;
use seriesdoc_sync_engine::{DocumentStore, SyncConfig, SyncEngine, WriteReport};
use std::io::Write;

/// Writes points to the store at `url`.
pub fn run(
    out: &mut impl Write,
    url: &str,
    timeout_secs: u64,
    config: SyncConfig,
    points: &[TimeSeriesPoint],
) -> Result<(), CliError> {
    let store = client::connect(url, timeout_secs)?;
    write(out, config, store, points)
}

fn write<S: DocumentStore>(
    out: &mut impl Write,
    config: SyncConfig,
    store: S,
    points: &[TimeSeriesPoint],
) -> Result<(), CliError> {
    let engine = SyncEngine::new(config, store);
    let report = engine.write_points(points)?;
    print_report(out, &report)?;
    Ok(())
}

fn print_report(out: &mut impl Write, report: &WriteReport) -> std::io::Result<()> {
    let exec = &report.execution;
    writeln!(
        out,
        "{}: {} point(s) -> {} document(s); deleted {}, not found {}, inserted {}",
        report.index,
        report.points,
        report.documents,
        exec.deleted,
        exec.not_found,
        exec.inserted
    )?;
    if exec.delete_skipped {
        writeln!(out, "delete phase skipped: index not searchable yet")?;
    }
    if exec.retried_deletes > 0 {
        writeln!(out, "retried {} delete(s)", exec.retried_deletes)?;
    }
    Ok(())
}
