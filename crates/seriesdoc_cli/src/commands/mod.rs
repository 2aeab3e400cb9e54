//! CLI command implementations.

pub mod mapping;
pub mod ping;
pub mod plan;
pub mod sync;
