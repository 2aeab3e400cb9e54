//! Ping command implementation.

use crate::client;
use crate::error::CliError;
use seriesdoc_sync_engine::DocumentStore;
use std::io::Write;

/// Checks reachability and prints the store version.
pub fn run(
    out: &mut impl Write,
    url: &str,
    timeout_secs: u64,
    verbose: bool,
) -> Result<(), CliError> {
    let store = client::connect(url, timeout_secs)?;
    let info = store.ping()?;
    if verbose {
        writeln!(
            out,
            "{} (cluster {}, node {})",
            url,
            info.cluster_name.as_deref().unwrap_or("-"),
            info.name.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(out, "{}", info.version.number)?;
    Ok(())
}
