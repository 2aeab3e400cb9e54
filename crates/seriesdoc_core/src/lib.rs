//! # seriesdoc core
//!
//! Turns time-series points into documents for a schema-on-write document store.
//!
//! This crate provides:
//! - `TimeSeriesPoint` and the typed `FieldValue` carried by tags/fields
//! - `Document`, an ordered attribute map with a `type` discriminator
//! - `DocumentBuilder`, which expands a point into wide/array/flat documents
//! - `identity`, the content-derived document identifier
//!
//! ## Key Invariants
//!
//! - A document's identity depends only on its declared key fields, in order
//! - Key fields travel beside the document and are never re-derived from it
//! - Tag-bearing and field-bearing halves of a point are expanded independently
//! - Merge mode routes field-bearing documents to one shared type, never both
//!
//! This is a pure crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod document;
mod error;
mod identity;
mod mode;
mod point;
pub mod time;
mod value;

pub use builder::{DocumentBuilder, KeyedDocument};
pub use document::{escape_field_name, Document, DocumentKind, KeyFields};
pub use error::{CoreError, CoreResult};
pub use identity::{identity, DocumentId};
pub use mode::{MergeLabel, OutputModes};
pub use point::TimeSeriesPoint;
pub use value::{FieldValue, NamedValue};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
