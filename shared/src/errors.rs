//! Error types for the body metrics engine
//!
//! Missing input is never an error here: calculators return `None` for it.
//! These variants cover structurally invalid input only.

use thiserror::Error;

/// Engine-wide error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Invalid date: {year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Reference date {reference} is before birth date {birth}")]
    ReferenceBeforeBirth { birth: String, reference: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias for engine operations
pub type MetricsResult<T> = Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message() {
        let err = MetricsError::InvalidDate {
            year: 2023,
            month: 2,
            day: 30,
        };
        assert_eq!(err.to_string(), "Invalid date: 2023-02-30 is not a calendar date");
    }

    #[test]
    fn test_reference_before_birth_message() {
        let err = MetricsError::ReferenceBeforeBirth {
            birth: "2000-05-01".to_string(),
            reference: "1999-05-01".to_string(),
        };
        assert!(err.to_string().contains("before birth date 2000-05-01"));
    }
}
