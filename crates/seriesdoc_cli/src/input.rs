//! Points file loading.

use crate::error::CliError;
use seriesdoc_core::TimeSeriesPoint;
use std::path::Path;
use tracing::debug;

/// Reads a JSON array of points.
pub fn load_points(path: &Path) -> Result<Vec<TimeSeriesPoint>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let points: Vec<TimeSeriesPoint> =
        serde_json::from_str(&text).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), points = points.len(), "loaded points");
    Ok(points)
}
