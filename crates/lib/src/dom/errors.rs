//! Error types for the host tree.
//!
//! Tree manipulation itself never fails: markup parsing is error tolerant and
//! node operations are total. The only failure the host reports is a selector
//! it cannot understand.

use thiserror::Error;

/// Structured error types for host tree operations.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomError {
    /// A CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl DomError {
    /// Check if this error is a selector syntax error
    pub fn is_invalid_selector(&self) -> bool {
        matches!(self, DomError::InvalidSelector { .. })
    }

    /// Get the offending selector if this is a selector error
    pub fn selector(&self) -> Option<&str> {
        match self {
            DomError::InvalidSelector { selector, .. } => Some(selector),
        }
    }
}

// Conversion from DomError to the main Error type
impl From<DomError> for crate::Error {
    fn from(err: DomError) -> Self {
        crate::Error::Dom(err)
    }
}
