//! # Pricewise Core Types
//!
//! The input records shared by every crate in the workspace, along with the
//! validation rules that keep nonsensical numbers out of the metrics engine.

pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{CostSchedule, MetricsInput, UnitEconomics};
