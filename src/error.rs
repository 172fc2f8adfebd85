//! Error types for the fallible edges of the planner
//!
//! The projection itself never fails; errors only come from reading scenario
//! files, writing or parsing CSV exports, and serving HTTP.

use thiserror::Error;

/// Errors raised outside the pure projection
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A year/month pair that does not name a calendar month
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    /// A CSV export that is missing an expected column or has a bad cell
    #[error("malformed export: {0}")]
    MalformedExport(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_month_display() {
        let err = PlannerError::InvalidMonth { year: 2025, month: 13 };
        assert_eq!(err.to_string(), "invalid month: 2025-13");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PlannerError = io.into();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
