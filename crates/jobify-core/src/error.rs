//! # Error Hierarchy
//!
//! Validation errors for the domain newtypes and enums, built with `thiserror`.

use thiserror::Error;

/// Validation errors raised when parsing wire values into domain types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is not a 24-character hexadecimal record id.
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),

    /// The role string is not one of the known roles.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// The job status string is not one of the known statuses.
    #[error("invalid status value: {0:?}")]
    InvalidJobStatus(String),

    /// The job type string is not one of the known types.
    #[error("invalid job type: {0:?}")]
    InvalidJobType(String),

    /// The sort key is not one of the supported orderings.
    #[error("invalid sort option: {0:?}")]
    InvalidSort(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_value() {
        let err = ValidationError::InvalidJobType("remote".into());
        assert_eq!(err.to_string(), "invalid job type: \"remote\"");
    }
}
