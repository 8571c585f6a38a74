//! Ratio data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ratios produced by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    /// Current assets over current liabilities.
    CurrentRatio,
    /// Total liabilities over total equity.
    DebtToEquity,
    /// Current assets minus current liabilities.
    WorkingCapital,
}

impl RatioKind {
    /// Stable machine name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentRatio => "current_ratio",
            Self::DebtToEquity => "debt_to_equity",
            Self::WorkingCapital => "working_capital",
        }
    }
}

/// Qualitative status of a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioStatus {
    /// Within the healthy band.
    Good,
    /// Above the healthy band.
    High,
    /// Below the healthy band.
    Low,
}

/// A computed ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioResult {
    /// Which ratio this is.
    pub kind: RatioKind,
    /// Machine name of the ratio.
    pub name: String,
    /// Ratio value; `0` when the denominator was zero.
    pub value: Decimal,
    /// Qualitative status.
    pub status: RatioStatus,
    /// True when `value` is the zero-denominator sentinel, not a real result.
    pub denominator_zero: bool,
}

impl RatioResult {
    pub(crate) fn new(kind: RatioKind, value: Decimal, status: RatioStatus) -> Self {
        Self {
            kind,
            name: kind.as_str().to_string(),
            value,
            status,
            denominator_zero: false,
        }
    }

    pub(crate) fn sentinel(kind: RatioKind, status: RatioStatus) -> Self {
        Self {
            denominator_zero: true,
            ..Self::new(kind, Decimal::ZERO, status)
        }
    }
}
