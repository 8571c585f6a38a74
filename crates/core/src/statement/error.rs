//! Statement error types.

use thiserror::Error;

use crate::aging::AgingError;
use crate::numeric::Overflow;
use crate::tax::TaxError;

/// Errors that can occur while assembling a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// Invoice input was rejected.
    #[error(transparent)]
    Tax(#[from] TaxError),

    /// Aging input was rejected.
    #[error(transparent)]
    Aging(#[from] AgingError),

    /// A total, difference or ratio left the decimal range.
    #[error("Statement amounts out of range: {0}")]
    Overflow(#[from] Overflow),

    /// Engine configuration failed validation.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Requested period is not in the period set.
    #[error("Period not found: {0}")]
    PeriodNotFound(String),
}

impl StatementError {
    /// Returns true for errors caused by caller input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        match self {
            Self::Tax(err) => err.is_invalid_input(),
            Self::Aging(err) => err.is_invalid_input(),
            Self::Overflow(_) | Self::InvalidConfig(_) => true,
            Self::PeriodNotFound(_) => false,
        }
    }
}
