//! # Pricewise Metrics Engine
//!
//! This crate turns an offer's business inputs into its order funnel, cost
//! breakdown and profitability, and searches for break-even stock levels.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage,
//!   UI or network. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `MetricsEngine` takes a `MetricsInput` and
//!   produces a fresh `MetricsReport` on every call. Identical input always gives
//!   identical output, and one engine can serve any number of threads.
//!
//! ## Public API
//!
//! - `MetricsEngine`: computes a `MetricsReport`, or a sweep of them over a `StockRange`.
//! - `BreakEvenSolver`: binary-searches the stock level for a target profit.
//! - `BreakEvenOutcome`: tells a converged result apart from an approximate one.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod break_even;
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use break_even::{BreakEvenOutcome, BreakEvenSolver};
pub use engine::{MetricsEngine, StockRange};
pub use error::AnalyticsError;
pub use report::MetricsReport;
