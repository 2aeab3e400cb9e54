//! # seriesdoc sync engine
//!
//! Publishes time-series points to a document store.
//!
//! This crate provides:
//! - The `DocumentStore` seam, with an HTTP implementation over an abstract
//!   `HttpClient` and an in-memory implementation for tests and dry runs
//! - Index lifecycle (`IndexManager`), tolerant of concurrent creation
//! - Paired delete/insert batches keyed by document identity
//! - The delete-then-insert `BatchExecutor`
//! - `SyncEngine`, which ties building, index lifecycle and execution together
//!
//! ## Architecture
//!
//! Every write follows a **build-then-replace** model:
//! 1. Expand all points into documents and compute their identities
//! 2. Ensure the destination index `d_<project>` exists
//! 3. Delete the previous version of every document
//! 4. Insert the new versions
//!
//! ## Key Invariants
//!
//! - Nothing is sent before every point of a call has been built
//! - Inserts only start after the delete phase fully succeeded
//! - Deletes of missing documents are tolerated; other item failures are not
//! - Every submitted action must come back with a result
//! - Writing the same points twice leaves the same documents as writing once

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod config;
mod engine;
mod error;
mod executor;
mod http;
mod index;
mod memory;
mod store;

pub use batch::BulkBatches;
pub use config::{index_name, DeleteFailurePolicy, SyncConfig, INDEX_PREFIX};
pub use engine::{SyncEngine, SyncStats, WriteReport};
pub use error::{BulkPhase, ItemFailure, SyncError, SyncResult};
pub use executor::{BatchExecutor, ExecuteReport};
pub use http::{HttpClient, HttpError, HttpMethod, HttpResponse, HttpStore};
pub use index::{IndexManager, IndexStatus};
pub use memory::MemoryStore;
pub use store::DocumentStore;
