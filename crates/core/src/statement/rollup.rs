//! Rollup of line items into section and grand totals.

use rust_decimal::Decimal;

use super::error::StatementError;
use super::types::{BalanceSheetSnapshot, LineItem, Section, SectionTotals, Totals};
use crate::numeric::{Overflow, try_add, try_sum};

/// Sums the amounts of a list of items. An empty list sums to zero.
///
/// # Errors
///
/// Returns `Overflow` if the total leaves the decimal range.
pub fn sum_items(items: &[LineItem]) -> Result<Decimal, Overflow> {
    try_sum(items.iter().map(|item| item.amount), "line item total")
}

impl SectionTotals {
    /// Totals of a section.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if a total leaves the decimal range.
    pub fn of(section: &Section) -> Result<Self, Overflow> {
        let current = sum_items(&section.current)?;
        let non_current = sum_items(&section.non_current)?;

        Ok(Self {
            current,
            non_current,
            total: try_add(current, non_current, "section total")?,
        })
    }
}

/// Rolls a balance sheet up into section and grand totals.
///
/// # Errors
///
/// Returns `StatementError::Overflow` if a total leaves the decimal range.
pub fn aggregate_snapshot(snapshot: &BalanceSheetSnapshot) -> Result<Totals, StatementError> {
    let assets = SectionTotals::of(&snapshot.assets)?;
    let liabilities = SectionTotals::of(&snapshot.liabilities)?;
    let total_equity = sum_items(&snapshot.equity)?;

    Ok(Totals {
        assets,
        liabilities,
        total_assets: assets.total,
        total_liabilities: liabilities.total,
        total_equity,
        total_liabilities_and_equity: try_add(
            liabilities.total,
            total_equity,
            "liabilities and equity total",
        )?,
    })
}
