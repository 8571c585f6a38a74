//! Liquidity and leverage ratios over aggregated totals.

use finstat_shared::RatioConfig;
use rust_decimal::Decimal;
use tracing::warn;

use super::types::{RatioKind, RatioResult, RatioStatus};
use crate::numeric::{Overflow, ratio_of, try_sub};
use crate::statement::Totals;

/// Ratio calculator bound to a set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct RatioCalculator {
    config: RatioConfig,
}

impl RatioCalculator {
    /// Creates a calculator.
    #[must_use]
    pub const fn new(config: RatioConfig) -> Self {
        Self { config }
    }

    /// Current assets over current liabilities.
    ///
    /// Good inside `[low, high]`, high above, low below. Zero liabilities
    /// yield `0` with status low.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the quotient leaves the decimal range.
    pub fn current_ratio(
        &self,
        current_assets: Decimal,
        current_liabilities: Decimal,
    ) -> Result<RatioResult, Overflow> {
        let kind = RatioKind::CurrentRatio;
        let Some(value) = ratio_of(current_assets, current_liabilities, kind.as_str())? else {
            return Ok(RatioResult::sentinel(kind, RatioStatus::Low));
        };

        let status = if value < self.config.current_ratio_low {
            RatioStatus::Low
        } else if value > self.config.current_ratio_high {
            RatioStatus::High
        } else {
            RatioStatus::Good
        };

        Ok(RatioResult::new(kind, value, status))
    }

    /// Total liabilities over total equity.
    ///
    /// Good below the threshold, high otherwise. Zero equity yields `0` with
    /// status good and `denominator_zero` set, since the leverage is really
    /// undefined.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the quotient leaves the decimal range.
    pub fn debt_to_equity(
        &self,
        total_liabilities: Decimal,
        total_equity: Decimal,
    ) -> Result<RatioResult, Overflow> {
        let kind = RatioKind::DebtToEquity;
        let Some(value) = ratio_of(total_liabilities, total_equity, kind.as_str())? else {
            warn!(
                %total_liabilities,
                "Total equity is zero; debt-to-equity reported as 0 (good)"
            );
            return Ok(RatioResult::sentinel(kind, RatioStatus::Good));
        };

        let status = if value < self.config.debt_to_equity_high {
            RatioStatus::Good
        } else {
            RatioStatus::High
        };

        Ok(RatioResult::new(kind, value, status))
    }

    /// Current assets minus current liabilities. Good when positive.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the difference leaves the decimal range.
    pub fn working_capital(
        &self,
        current_assets: Decimal,
        current_liabilities: Decimal,
    ) -> Result<RatioResult, Overflow> {
        let kind = RatioKind::WorkingCapital;
        let value = try_sub(current_assets, current_liabilities, kind.as_str())?;
        let status = if value > Decimal::ZERO {
            RatioStatus::Good
        } else {
            RatioStatus::Low
        };

        Ok(RatioResult::new(kind, value, status))
    }

    /// Current ratio, debt-to-equity and working capital, in that order.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` naming the first ratio that leaves the decimal range.
    pub fn compute(&self, totals: &Totals) -> Result<Vec<RatioResult>, Overflow> {
        Ok(vec![
            self.current_ratio(totals.assets.current, totals.liabilities.current)?,
            self.debt_to_equity(totals.total_liabilities, totals.total_equity)?,
            self.working_capital(totals.assets.current, totals.liabilities.current)?,
        ])
    }
}

/// Computes the ratio set for aggregated totals.
///
/// # Errors
///
/// Returns `Overflow` naming the first ratio that leaves the decimal range.
pub fn compute_ratios(totals: &Totals, config: &RatioConfig) -> Result<Vec<RatioResult>, Overflow> {
    RatioCalculator::new(config.clone()).compute(totals)
}
