//! Aging error types.

use thiserror::Error;

use crate::numeric::Overflow;

/// Errors that can occur while aging receivables or payables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgingError {
    /// Date string is not a valid `YYYY-MM-DD` date.
    #[error("Malformed date '{input}': {reason}")]
    MalformedDate {
        /// Offending input.
        input: String,
        /// Parser message.
        reason: String,
    },

    /// Aging configuration failed validation.
    #[error("Invalid aging configuration: {0}")]
    InvalidConfig(String),

    /// A bucket amount or total left the decimal range.
    #[error("Aging amounts out of range: {0}")]
    Overflow(#[from] Overflow),
}

impl AgingError {
    /// Returns true for errors caused by caller input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedDate { .. } | Self::InvalidConfig(_) | Self::Overflow(_)
        )
    }
}
