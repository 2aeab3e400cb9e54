//! # seriesdoc testkit
//!
//! Test utilities for seriesdoc.
//!
//! This crate provides:
//! - Timestamp helpers and sample points shaped like real series
//! - Points files on disk for exercising input loading
//! - Property-based generators for points and output modes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seriesdoc_testkit::prelude::*;
//!
//! #[test]
//! fn writes_once() {
//!     let points = vec![tag_point("prs", "2019-01-01 00:00:00")];
//!     // ... write points twice, count once
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
