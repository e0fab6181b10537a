//! Unified error types for the domain layer
//!
//! Provides a common error type for value-object construction and parsing,
//! so adapters never have to fall back to stringly-typed errors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., a display name outside the allowed length)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for value-object invariants.
    ///
    /// # Example
    /// ```ignore
    /// if name.chars().count() < 2 {
    ///     return Err(DomainError::validation("Name must have at least 2 characters"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::validation("too short");
        assert_eq!(err.to_string(), "Validation failed: too short");

        let err = DomainError::parse("bad token");
        assert_eq!(err.to_string(), "Parse error: bad token");
    }
}
