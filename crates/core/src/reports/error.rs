//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Unsupported grouping key.
    #[error("Invalid group_by: {0}")]
    InvalidGroupBy(String),
}
