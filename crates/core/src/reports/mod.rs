//! Budget and transaction report generation.
//!
//! This module provides pure business logic for report aggregation:
//! - Budget-vs-actual summary
//! - Budget-vs-actual trend series per month
//! - Monthly breakdown (by category, by day, net)
//! - Grouped transaction summary

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::ReportEngine;
pub use error::ReportError;
pub use types::*;
