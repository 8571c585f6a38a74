//! Tax error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Invoices rejected by the tax summarizer.
///
/// `line` is the zero-based position of the offending invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxError {
    /// Quantity is negative.
    #[error("Line {line}: quantity cannot be negative ({quantity})")]
    NegativeQuantity {
        /// Line index.
        line: usize,
        /// Offending quantity.
        quantity: Decimal,
    },

    /// Tax rate is negative.
    #[error("Line {line}: tax rate cannot be negative ({rate}%)")]
    NegativeTaxRate {
        /// Line index.
        line: usize,
        /// Offending rate.
        rate: Decimal,
    },

    /// Discount is outside `[0, 100]`.
    #[error("Line {line}: discount must be between 0 and 100 ({discount}%)")]
    DiscountOutOfRange {
        /// Line index.
        line: usize,
        /// Offending discount.
        discount: Decimal,
    },

    /// A line's values, or the running totals up to it, leave the decimal range.
    #[error("Line {line}: amount exceeds the representable decimal range")]
    Overflow {
        /// Line index.
        line: usize,
    },

    /// Flat charges or the grand total leave the decimal range.
    #[error("Invoice total exceeds the representable decimal range")]
    TotalOverflow,
}

impl TaxError {
    /// Returns true for errors caused by caller input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NegativeQuantity { .. }
                | Self::NegativeTaxRate { .. }
                | Self::DiscountOutOfRange { .. }
                | Self::Overflow { .. }
                | Self::TotalOverflow
        )
    }

    /// Index of the offending line, if the error belongs to one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::NegativeQuantity { line, .. }
            | Self::NegativeTaxRate { line, .. }
            | Self::DiscountOutOfRange { line, .. }
            | Self::Overflow { line } => Some(*line),
            Self::TotalOverflow => None,
        }
    }
}
