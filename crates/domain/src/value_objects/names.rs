//! Validated display name newtype
//!
//! A display name is valid by construction:
//! - Trimmed of leading/trailing whitespace
//! - Between 2 and 20 characters (Unicode scalar values, not bytes)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Minimum number of characters in a display name
pub const MIN_DISPLAY_NAME_CHARS: usize = 2;

/// Maximum number of characters in a display name
pub const MAX_DISPLAY_NAME_CHARS: usize = 20;

/// A validated player display name (trimmed, 2..=20 chars)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new validated display name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if, after trimming, the name has
    /// fewer than 2 or more than 20 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        let len = trimmed.chars().count();
        if len < MIN_DISPLAY_NAME_CHARS {
            return Err(DomainError::validation(format!(
                "Name must have at least {} characters",
                MIN_DISPLAY_NAME_CHARS
            )));
        }
        if len > MAX_DISPLAY_NAME_CHARS {
            return Err(DomainError::validation(format!(
                "Name cannot have more than {} characters",
                MAX_DISPLAY_NAME_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char_rejected() {
        let result = DisplayName::new("A");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_twenty_one_chars_rejected() {
        let name = "a".repeat(21);
        assert!(DisplayName::new(name).is_err());
    }

    #[test]
    fn test_bounds_accepted() {
        assert_eq!(DisplayName::new("Al").map(String::from), Ok("Al".to_string()));
        let twenty = "b".repeat(20);
        assert_eq!(
            DisplayName::new(twenty.clone()).map(String::from),
            Ok(twenty)
        );
    }

    #[test]
    fn test_trimmed_before_validation() {
        // Whitespace padding does not count toward the length
        assert!(DisplayName::new("  A  ").is_err());

        let name = DisplayName::new("  Ana  ").expect("valid name");
        assert_eq!(name.as_str(), "Ana");
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 20 two-byte characters is still 20 characters
        let name = "ñ".repeat(20);
        assert!(DisplayName::new(name).is_ok());
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<DisplayName, _> = serde_json::from_str("\"Maria\"");
        assert!(ok.is_ok());

        let bad: Result<DisplayName, _> = serde_json::from_str("\"M\"");
        assert!(bad.is_err());
    }
}
