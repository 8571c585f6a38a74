//! Period-over-period comparison.
//!
//! Items are paired within a category in two passes:
//! 1. stable `ItemId` equality;
//! 2. exact name equality, unless both items carry (different) ids.
//!
//! Names are not assumed unique. In each pass the n-th unpaired base item
//! takes the first unpaired comparison candidate, so repeated names pair up in
//! order and the pairing is the same whichever side is the base.

use rust_decimal::Decimal;

use super::error::StatementError;
use super::rollup::aggregate_snapshot;
use super::types::{
    BalanceSheetSnapshot, Category, CategoryDeltas, ComparisonResult, Delta, GrandTotal,
    GrandTotalDeltas, ItemComparison, LineItem, MatchKind, Totals,
};
use crate::numeric::{Overflow, percent_of, try_sub};

impl Delta {
    /// Delta of a value present in both periods.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the difference or the percentage change leaves
    /// the decimal range.
    pub fn between(amount: Decimal, comparison_amount: Decimal) -> Result<Self, Overflow> {
        let difference = try_sub(amount, comparison_amount, "period difference")?;

        Ok(Self {
            amount: Some(amount),
            comparison_amount: Some(comparison_amount),
            difference: Some(difference),
            percent_change: percent_of(difference, comparison_amount)?,
        })
    }

    /// Delta of a value present in the base period only.
    #[must_use]
    pub const fn base_only(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            comparison_amount: None,
            difference: None,
            percent_change: None,
        }
    }

    /// Delta of a value present in the comparison period only.
    #[must_use]
    pub const fn comparison_only(comparison_amount: Decimal) -> Self {
        Self {
            amount: None,
            comparison_amount: Some(comparison_amount),
            difference: None,
            percent_change: None,
        }
    }
}

/// Compares a base balance sheet against a comparison balance sheet.
///
/// # Errors
///
/// Returns `StatementError::Overflow` if a total or difference leaves the
/// decimal range.
pub fn compare_periods(
    base: &BalanceSheetSnapshot,
    comparison: &BalanceSheetSnapshot,
) -> Result<ComparisonResult, StatementError> {
    let mut items = Vec::new();
    for category in Category::ALL {
        items.extend(compare_category(
            category,
            base.items(category),
            comparison.items(category),
        )?);
    }

    let base_totals = aggregate_snapshot(base)?;
    let comparison_totals = aggregate_snapshot(comparison)?;

    Ok(ComparisonResult {
        base_as_of: base.as_of,
        comparison_as_of: comparison.as_of,
        items,
        categories: category_deltas(&base_totals, &comparison_totals)?,
        grand_totals: grand_total_deltas(&base_totals, &comparison_totals)?,
    })
}

fn category_deltas(base: &Totals, comparison: &Totals) -> Result<CategoryDeltas, Overflow> {
    let delta = |category| {
        Delta::between(
            base.category_total(category),
            comparison.category_total(category),
        )
    };

    Ok(CategoryDeltas {
        current_assets: delta(Category::CurrentAssets)?,
        non_current_assets: delta(Category::NonCurrentAssets)?,
        current_liabilities: delta(Category::CurrentLiabilities)?,
        non_current_liabilities: delta(Category::NonCurrentLiabilities)?,
        equity: delta(Category::Equity)?,
    })
}

fn grand_total_deltas(base: &Totals, comparison: &Totals) -> Result<GrandTotalDeltas, Overflow> {
    let delta = |total| Delta::between(base.grand_total(total), comparison.grand_total(total));

    Ok(GrandTotalDeltas {
        assets: delta(GrandTotal::Assets)?,
        liabilities: delta(GrandTotal::Liabilities)?,
        equity: delta(GrandTotal::Equity)?,
        liabilities_and_equity: delta(GrandTotal::LiabilitiesAndEquity)?,
    })
}

/// Pairs the items of one category and produces its comparison rows.
///
/// Base rows come first in base order, followed by comparison-only rows in
/// comparison order.
fn compare_category(
    category: Category,
    base: &[LineItem],
    comparison: &[LineItem],
) -> Result<Vec<ItemComparison>, Overflow> {
    let pairing = pair_items(base, comparison);
    let mut consumed = vec![false; comparison.len()];
    let mut rows = Vec::with_capacity(base.len() + comparison.len());

    for (item, paired) in base.iter().zip(&pairing) {
        let row = match *paired {
            Some((index, match_kind)) => {
                consumed[index] = true;
                let other = &comparison[index];
                ItemComparison {
                    category,
                    id: item.id.or(other.id),
                    name: item.name.clone(),
                    match_kind,
                    delta: Delta::between(item.amount, other.amount)?,
                }
            }
            None => ItemComparison {
                category,
                id: item.id,
                name: item.name.clone(),
                match_kind: MatchKind::BaseOnly,
                delta: Delta::base_only(item.amount),
            },
        };
        rows.push(row);
    }

    rows.extend(
        comparison
            .iter()
            .zip(consumed)
            .filter(|(_, used)| !used)
            .map(|(other, _)| ItemComparison {
                category,
                id: other.id,
                name: other.name.clone(),
                match_kind: MatchKind::ComparisonOnly,
                delta: Delta::comparison_only(other.amount),
            }),
    );

    Ok(rows)
}

/// For each base item, the index of its comparison counterpart, if any.
fn pair_items(base: &[LineItem], comparison: &[LineItem]) -> Vec<Option<(usize, MatchKind)>> {
    let mut pairing = vec![None; base.len()];
    let mut taken = vec![false; comparison.len()];

    for (slot, item) in pairing.iter_mut().zip(base) {
        let Some(id) = item.id else { continue };
        if let Some(index) = first_free(comparison, &taken, |other| other.id == Some(id)) {
            taken[index] = true;
            *slot = Some((index, MatchKind::ById));
        }
    }

    for (slot, item) in pairing.iter_mut().zip(base) {
        if slot.is_some() {
            continue;
        }
        let candidate = first_free(comparison, &taken, |other| {
            other.name == item.name && !(item.id.is_some() && other.id.is_some())
        });
        if let Some(index) = candidate {
            taken[index] = true;
            *slot = Some((index, MatchKind::ByName));
        }
    }

    pairing
}

fn first_free(
    candidates: &[LineItem],
    taken: &[bool],
    matches: impl Fn(&LineItem) -> bool,
) -> Option<usize> {
    candidates
        .iter()
        .zip(taken)
        .position(|(candidate, used)| !used && matches(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::types::Section;
    use chrono::NaiveDate;
    use finstat_shared::types::ItemId;
    use rust_decimal_macros::dec;

    fn snapshot(year: i32, current_assets: Vec<LineItem>) -> BalanceSheetSnapshot {
        BalanceSheetSnapshot {
            as_of: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
            assets: Section::new(current_assets, vec![]),
            liabilities: Section::default(),
            equity: vec![],
        }
    }

    #[test]
    fn test_matched_item_delta() {
        let base = snapshot(2025, vec![LineItem::new("Cash", dec!(125000))]);
        let prior = snapshot(2024, vec![LineItem::new("Cash", dec!(100000))]);

        let result = compare_periods(&base, &prior).unwrap();
        let cash = result.item(Category::CurrentAssets, "Cash").unwrap();

        assert_eq!(cash.match_kind, MatchKind::ByName);
        assert_eq!(cash.delta.difference, Some(dec!(25000)));
        assert_eq!(cash.delta.percent_change, Some(dec!(25)));
    }

    #[test]
    fn test_zero_baseline_has_no_percent_change() {
        let base = snapshot(2025, vec![LineItem::new("Prepaid", dec!(500))]);
        let prior = snapshot(2024, vec![LineItem::new("Prepaid", Decimal::ZERO)]);

        let result = compare_periods(&base, &prior).unwrap();
        let row = result.item(Category::CurrentAssets, "Prepaid").unwrap();

        assert_eq!(row.delta.difference, Some(dec!(500)));
        assert_eq!(row.delta.percent_change, None);
        assert!(!row.delta.has_baseline());
        assert!(row.delta.is_matched());
    }

    #[test]
    fn test_unmatched_items_keep_counterpart_undefined() {
        let base = snapshot(2025, vec![LineItem::new("Inventory", dec!(40000))]);
        let prior = snapshot(2024, vec![LineItem::new("Marketable Securities", dec!(0))]);

        let result = compare_periods(&base, &prior).unwrap();

        let inventory = result.item(Category::CurrentAssets, "Inventory").unwrap();
        assert_eq!(inventory.match_kind, MatchKind::BaseOnly);
        assert_eq!(inventory.delta.comparison_amount, None);
        assert_eq!(inventory.delta.difference, None);

        let securities = result
            .item(Category::CurrentAssets, "Marketable Securities")
            .unwrap();
        assert_eq!(securities.match_kind, MatchKind::ComparisonOnly);
        assert_eq!(securities.delta.amount, None);
        assert_eq!(securities.delta.comparison_amount, Some(Decimal::ZERO));
    }

    #[test]
    fn test_matching_is_scoped_to_category() {
        let mut base = snapshot(2025, vec![]);
        base.liabilities.current.push(LineItem::new("Deposits", dec!(10)));
        let prior = snapshot(2024, vec![LineItem::new("Deposits", dec!(7))]);

        let result = compare_periods(&base, &prior).unwrap();

        assert_eq!(
            result
                .item(Category::CurrentLiabilities, "Deposits")
                .unwrap()
                .match_kind,
            MatchKind::BaseOnly
        );
        assert_eq!(
            result
                .item(Category::CurrentAssets, "Deposits")
                .unwrap()
                .match_kind,
            MatchKind::ComparisonOnly
        );
    }

    #[test]
    fn test_duplicate_names_pair_in_order() {
        let base = snapshot(
            2025,
            vec![
                LineItem::new("Bank", dec!(100)),
                LineItem::new("Bank", dec!(200)),
                LineItem::new("Bank", dec!(300)),
            ],
        );
        let prior = snapshot(
            2024,
            vec![LineItem::new("Bank", dec!(90)), LineItem::new("Bank", dec!(180))],
        );

        let result = compare_periods(&base, &prior).unwrap();
        let rows: Vec<_> = result.items_in(Category::CurrentAssets).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].delta.difference, Some(dec!(10)));
        assert_eq!(rows[1].delta.difference, Some(dec!(20)));
        assert_eq!(rows[2].match_kind, MatchKind::BaseOnly);
    }

    #[test]
    fn test_id_match_wins_over_name() {
        let id = ItemId::new();
        let base = snapshot(
            2025,
            vec![LineItem::with_id(id, "Cash and Equivalents", dec!(150))],
        );
        let prior = snapshot(
            2024,
            vec![
                LineItem::new("Cash and Equivalents", dec!(999)),
                LineItem::with_id(id, "Cash", dec!(100)),
            ],
        );

        let result = compare_periods(&base, &prior).unwrap();
        let row = result.item_by_id(Category::CurrentAssets, id).unwrap();

        assert_eq!(row.match_kind, MatchKind::ById);
        assert_eq!(row.name, "Cash and Equivalents");
        assert_eq!(row.delta.difference, Some(dec!(50)));
        assert_eq!(
            result
                .items_in(Category::CurrentAssets)
                .filter(|r| r.match_kind == MatchKind::ComparisonOnly)
                .count(),
            1
        );
    }

    #[test]
    fn test_distinct_ids_never_match_by_name() {
        let base = snapshot(2025, vec![LineItem::with_id(ItemId::new(), "Loan", dec!(10))]);
        let prior = snapshot(2024, vec![LineItem::with_id(ItemId::new(), "Loan", dec!(20))]);

        let result = compare_periods(&base, &prior).unwrap();

        assert!(
            result
                .items_in(Category::CurrentAssets)
                .all(|row| !row.delta.is_matched())
        );
    }

    #[test]
    fn test_grand_total_lookups() {
        let mut base = snapshot(2025, vec![LineItem::new("Cash", dec!(300))]);
        base.equity.push(LineItem::new("Retained Earnings", dec!(300)));
        let mut prior = snapshot(2024, vec![LineItem::new("Cash", dec!(200))]);
        prior.liabilities.current.push(LineItem::new("AP", dec!(50)));
        prior.equity.push(LineItem::new("Retained Earnings", dec!(150)));

        let result = compare_periods(&base, &prior).unwrap();

        assert_eq!(
            result.grand_total(GrandTotal::Assets).percent_change,
            Some(dec!(50))
        );
        assert_eq!(
            result.grand_total(GrandTotal::Liabilities).difference,
            Some(dec!(-50))
        );
        assert_eq!(
            result.grand_total(GrandTotal::LiabilitiesAndEquity).difference,
            Some(dec!(100))
        );
        assert_eq!(
            result.category_total(Category::Equity).difference,
            Some(dec!(150))
        );
        assert!(!result.category_total(Category::NonCurrentAssets).has_baseline());
    }

    #[test]
    fn test_out_of_range_difference_is_an_error() {
        let base = snapshot(2025, vec![LineItem::new("Cash", Decimal::MAX)]);
        let prior = snapshot(2024, vec![LineItem::new("Cash", dec!(-1))]);

        assert_eq!(
            compare_periods(&base, &prior),
            Err(StatementError::Overflow(Overflow("period difference")))
        );
    }

    #[test]
    fn test_out_of_range_percentage_is_an_error() {
        let base = snapshot(2025, vec![LineItem::new("Cash", Decimal::MAX)]);
        let prior = snapshot(2024, vec![LineItem::new("Cash", dec!(1))]);

        assert_eq!(
            compare_periods(&base, &prior),
            Err(StatementError::Overflow(Overflow("percentage")))
        );
    }
}
