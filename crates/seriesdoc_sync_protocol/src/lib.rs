//! # seriesdoc sync protocol
//!
//! Wire types for talking to the document store.
//!
//! This crate provides:
//! - `BulkRequest` and its NDJSON encoding
//! - `BulkResponse` with per-item outcome classification
//! - `ErrorCause` for store-level errors
//! - `IndexSettings`, the fixed schema of the destination index
//! - `Query` bodies for delete-by-query
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bulk;
mod error;
mod query;
mod response;
mod settings;

pub use bulk::{BulkAction, BulkRequest};
pub use error::{ProtocolError, ProtocolResult};
pub use query::Query;
pub use response::{
    BulkItem, BulkItemResult, BulkResponse, ClusterInfo, CreateIndexResponse,
    DeleteByQueryResponse, ErrorCause, VersionInfo,
};
pub use settings::IndexSettings;
