//! Error types for the sync engine.

use seriesdoc_core::CoreError;
use seriesdoc_sync_protocol::{ErrorCause, ProtocolError};
use std::fmt;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Which half of the delete-then-insert protocol an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPhase {
    /// Removal of previous document versions.
    Delete,
    /// Insertion of the new document versions.
    Insert,
}

impl fmt::Display for BulkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkPhase::Delete => write!(f, "delete"),
            BulkPhase::Insert => write!(f, "insert"),
        }
    }
}

/// A bulk item that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Position of the action in its batch.
    pub position: usize,
    /// Identity of the document the action targeted.
    pub id: String,
    /// Status code reported for the item.
    pub status: u16,
    /// Error cause, when the store gave one.
    pub cause: Option<ErrorCause>,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.position, self.id, self.status)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The store rejected a request as a whole.
    #[error("store error ({status}): {cause}")]
    Store {
        /// Response status.
        status: u16,
        /// Reported cause.
        cause: ErrorCause,
    },

    /// A point could not be turned into documents.
    #[error("document build failed: {0}")]
    Build(#[from] CoreError),

    /// A request or response did not encode/decode.
    #[error("codec error: {0}")]
    Codec(#[from] ProtocolError),

    /// Protocol error (unexpected response shape).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Index creation returned without acknowledgement.
    #[error("index {index} not created")]
    IndexNotCreated {
        /// Index name.
        index: String,
    },

    /// The store reported fewer results than actions submitted.
    #[error("bulk {phase}: not all actions executed, {remaining} remaining")]
    UnexecutedActions {
        /// Phase of the batch.
        phase: BulkPhase,
        /// Actions without a result.
        remaining: usize,
    },

    /// One or more bulk items failed.
    #[error("bulk {phase} failed for {} item(s){}", .failures.len(), first_failure(.failures))]
    ItemFailures {
        /// Phase of the batch.
        phase: BulkPhase,
        /// Failed items.
        failures: Vec<ItemFailure>,
    },

    /// Timeout.
    #[error("operation timed out")]
    Timeout,

    /// Not connected.
    #[error("not connected to store")]
    NotConnected,
}

fn first_failure(failures: &[ItemFailure]) -> String {
    failures
        .first()
        .map(|f| format!(", first: {}", f))
        .unwrap_or_default()
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns the store's error cause, if this is a store rejection.
    pub fn store_cause(&self) -> Option<&ErrorCause> {
        match self {
            SyncError::Store { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Returns true if the input points themselves were rejected.
    pub fn is_data_error(&self) -> bool {
        matches!(self, SyncError::Build(e) if e.is_data_error())
    }

    /// Returns true if re-running the whole operation may succeed.
    ///
    /// Data-integrity and protocol-invariant failures are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::Timeout => true,
            SyncError::Store { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
