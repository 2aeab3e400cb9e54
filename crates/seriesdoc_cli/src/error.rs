//! CLI errors.

use seriesdoc_core::CoreError;
use seriesdoc_sync_engine::SyncError;
use seriesdoc_sync_protocol::ProtocolError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// The points file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The points file is not a JSON array of points.
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// None of --wide, --array, --flat was given.
    #[error("at least one of --wide, --array, --flat is required")]
    NoOutputMode,

    /// Invalid argument value.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP client could not be set up.
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),

    /// A store operation failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A bulk body could not be encoded.
    #[error(transparent)]
    Codec(#[from] ProtocolError),

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
