//! Balance sheet data types.

use chrono::NaiveDate;
use finstat_shared::types::ItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aging::{AgingResult, AgingSource};
use crate::numeric::{Overflow, try_sub};
use crate::ratio::RatioResult;
use crate::tax::{AdditionalCharge, InvoiceLineItem, TaxSummary};

/// A single named amount on a balance sheet.
///
/// Amounts may be negative (treasury stock, contra accounts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identifier across periods, when the data source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Display name.
    pub name: String,
    /// Amount.
    pub amount: Decimal,
}

impl LineItem {
    /// Creates a line item without a stable identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            amount,
        }
    }

    /// Creates a line item carrying a stable identifier.
    #[must_use]
    pub fn with_id(id: ItemId, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            amount,
        }
    }
}

/// Current and non-current items of assets or liabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Items realizable or due within one year.
    #[serde(default)]
    pub current: Vec<LineItem>,
    /// Items realizable or due beyond one year.
    #[serde(default)]
    pub non_current: Vec<LineItem>,
}

impl Section {
    /// Creates a section from its two item lists.
    #[must_use]
    pub const fn new(current: Vec<LineItem>, non_current: Vec<LineItem>) -> Self {
        Self {
            current,
            non_current,
        }
    }
}

/// Balance sheet as of a given date.
///
/// Nothing here enforces `assets == liabilities + equity`; the assembler
/// reports whether it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSnapshot {
    /// Balance sheet date.
    pub as_of: NaiveDate,
    /// Assets.
    #[serde(default)]
    pub assets: Section,
    /// Liabilities.
    #[serde(default)]
    pub liabilities: Section,
    /// Equity items.
    #[serde(default)]
    pub equity: Vec<LineItem>,
}

impl BalanceSheetSnapshot {
    /// Returns the items of one category.
    #[must_use]
    pub fn items(&self, category: Category) -> &[LineItem] {
        match category {
            Category::CurrentAssets => &self.assets.current,
            Category::NonCurrentAssets => &self.assets.non_current,
            Category::CurrentLiabilities => &self.liabilities.current,
            Category::NonCurrentLiabilities => &self.liabilities.non_current,
            Category::Equity => &self.equity,
        }
    }
}

/// Balance sheet category. Items are only ever matched within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Current assets.
    CurrentAssets,
    /// Non-current assets.
    NonCurrentAssets,
    /// Current liabilities.
    CurrentLiabilities,
    /// Non-current liabilities.
    NonCurrentLiabilities,
    /// Equity.
    Equity,
}

impl Category {
    /// All categories in balance sheet order.
    pub const ALL: [Self; 5] = [
        Self::CurrentAssets,
        Self::NonCurrentAssets,
        Self::CurrentLiabilities,
        Self::NonCurrentLiabilities,
        Self::Equity,
    ];
}

/// Grand totals exposed by the rollup and the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrandTotal {
    /// Total assets.
    Assets,
    /// Total liabilities.
    Liabilities,
    /// Total equity.
    Equity,
    /// Liabilities plus equity.
    LiabilitiesAndEquity,
}

/// A labelled balance sheet, the unit of period comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Period identifier (e.g. "2025-Q4").
    pub id: String,
    /// Display label.
    pub label: String,
    /// Balance sheet data.
    pub data: BalanceSheetSnapshot,
}

/// The comparison universe: periods available to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodSet {
    periods: Vec<Period>,
}

impl PeriodSet {
    /// Creates a set from periods in display order.
    #[must_use]
    pub const fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// Looks up a period by id. If ids repeat, the first wins.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Period> {
        self.periods.iter().find(|p| p.id == id)
    }

    /// Iterates periods in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns true if there are no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Totals of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTotals {
    /// Sum of current items.
    pub current: Decimal,
    /// Sum of non-current items.
    pub non_current: Decimal,
    /// `current + non_current`.
    pub total: Decimal,
}

/// Rolled-up totals of a balance sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Asset section totals.
    pub assets: SectionTotals,
    /// Liability section totals.
    pub liabilities: SectionTotals,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub total_liabilities_and_equity: Decimal,
}

impl Totals {
    /// Returns the total of one category.
    #[must_use]
    pub const fn category_total(&self, category: Category) -> Decimal {
        match category {
            Category::CurrentAssets => self.assets.current,
            Category::NonCurrentAssets => self.assets.non_current,
            Category::CurrentLiabilities => self.liabilities.current,
            Category::NonCurrentLiabilities => self.liabilities.non_current,
            Category::Equity => self.total_equity,
        }
    }

    /// Returns one of the grand totals.
    #[must_use]
    pub const fn grand_total(&self, total: GrandTotal) -> Decimal {
        match total {
            GrandTotal::Assets => self.total_assets,
            GrandTotal::Liabilities => self.total_liabilities,
            GrandTotal::Equity => self.total_equity,
            GrandTotal::LiabilitiesAndEquity => self.total_liabilities_and_equity,
        }
    }

    /// `total_assets - total_liabilities_and_equity`.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the two sides are too far apart to represent.
    pub fn balance_difference(&self) -> Result<Decimal, Overflow> {
        try_sub(
            self.total_assets,
            self.total_liabilities_and_equity,
            "balance difference",
        )
    }
}

/// Amount pair of a compared value.
///
/// `None` on either side means the value does not exist in that period,
/// which is different from a true zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Amount in the base period.
    pub amount: Option<Decimal>,
    /// Amount in the comparison period.
    pub comparison_amount: Option<Decimal>,
    /// `amount - comparison_amount`, when both exist.
    pub difference: Option<Decimal>,
    /// `difference / comparison_amount * 100`, when a non-zero baseline exists.
    pub percent_change: Option<Decimal>,
}

impl Delta {
    /// Returns true if the comparison amount exists and is non-zero.
    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.comparison_amount.is_some_and(|c| !c.is_zero())
    }

    /// Returns true if the value exists in both periods.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.amount.is_some() && self.comparison_amount.is_some()
    }
}

/// How a compared item found its counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Matched on the stable item identifier.
    ById,
    /// Matched on exact name equality.
    ByName,
    /// Present in the base period only.
    BaseOnly,
    /// Present in the comparison period only.
    ComparisonOnly,
}

/// Comparison row for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemComparison {
    /// Category the item belongs to.
    pub category: Category,
    /// Stable identifier, taken from the base item when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Item name (base name for matched rows).
    pub name: String,
    /// How the counterpart was found.
    pub match_kind: MatchKind,
    /// Amounts and deltas.
    #[serde(flatten)]
    pub delta: Delta,
}

/// Deltas of the five category totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDeltas {
    /// Current assets.
    pub current_assets: Delta,
    /// Non-current assets.
    pub non_current_assets: Delta,
    /// Current liabilities.
    pub current_liabilities: Delta,
    /// Non-current liabilities.
    pub non_current_liabilities: Delta,
    /// Equity.
    pub equity: Delta,
}

impl CategoryDeltas {
    /// Returns the delta of one category.
    #[must_use]
    pub const fn get(&self, category: Category) -> &Delta {
        match category {
            Category::CurrentAssets => &self.current_assets,
            Category::NonCurrentAssets => &self.non_current_assets,
            Category::CurrentLiabilities => &self.current_liabilities,
            Category::NonCurrentLiabilities => &self.non_current_liabilities,
            Category::Equity => &self.equity,
        }
    }
}

/// Deltas of the grand totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandTotalDeltas {
    /// Total assets.
    pub assets: Delta,
    /// Total liabilities.
    pub liabilities: Delta,
    /// Total equity.
    pub equity: Delta,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Delta,
}

impl GrandTotalDeltas {
    /// Returns the delta of one grand total.
    #[must_use]
    pub const fn get(&self, total: GrandTotal) -> &Delta {
        match total {
            GrandTotal::Assets => &self.assets,
            GrandTotal::Liabilities => &self.liabilities,
            GrandTotal::Equity => &self.equity,
            GrandTotal::LiabilitiesAndEquity => &self.liabilities_and_equity,
        }
    }
}

/// Result of comparing a base period against a comparison period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Base period date.
    pub base_as_of: NaiveDate,
    /// Comparison period date.
    pub comparison_as_of: NaiveDate,
    /// Per-item rows, grouped by category in balance sheet order.
    pub items: Vec<ItemComparison>,
    /// Category total deltas.
    pub categories: CategoryDeltas,
    /// Grand total deltas.
    pub grand_totals: GrandTotalDeltas,
}

impl ComparisonResult {
    /// First row in `category` with the given name.
    #[must_use]
    pub fn item(&self, category: Category, name: &str) -> Option<&ItemComparison> {
        self.items
            .iter()
            .find(|row| row.category == category && row.name == name)
    }

    /// Row in `category` with the given stable identifier.
    #[must_use]
    pub fn item_by_id(&self, category: Category, id: ItemId) -> Option<&ItemComparison> {
        self.items
            .iter()
            .find(|row| row.category == category && row.id == Some(id))
    }

    /// Rows of one category.
    pub fn items_in(&self, category: Category) -> impl Iterator<Item = &ItemComparison> {
        self.items.iter().filter(move |row| row.category == category)
    }

    /// Delta of a category total.
    #[must_use]
    pub const fn category_total(&self, category: Category) -> &Delta {
        self.categories.get(category)
    }

    /// Delta of a grand total.
    #[must_use]
    pub const fn grand_total(&self, total: GrandTotal) -> &Delta {
        self.grand_totals.get(total)
    }
}

/// Everything needed to assemble one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRequest {
    /// Balance sheet of the requested period.
    pub snapshot: BalanceSheetSnapshot,
    /// Optional balance sheet to compare against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<BalanceSheetSnapshot>,
    /// Outstanding receivables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receivables: Option<AgingSource>,
    /// Outstanding payables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payables: Option<AgingSource>,
    /// Invoice to summarize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceInput>,
}

impl StatementRequest {
    /// Creates a request for a bare balance sheet.
    #[must_use]
    pub const fn new(snapshot: BalanceSheetSnapshot) -> Self {
        Self {
            snapshot,
            comparison: None,
            receivables: None,
            payables: None,
            invoice: None,
        }
    }
}

/// Invoice lines and flat charges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// Invoice lines.
    pub items: Vec<InvoiceLineItem>,
    /// Untaxed flat charges (transport, packaging).
    #[serde(default)]
    pub additional_charges: Vec<AdditionalCharge>,
}

/// Assembled statement for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Balance sheet date.
    pub as_of: NaiveDate,
    /// Rolled-up totals.
    pub totals: Totals,
    /// Period comparison, when a comparison snapshot was supplied.
    pub comparison: Option<ComparisonResult>,
    /// Receivable aging, when supplied.
    pub receivables: Option<AgingResult>,
    /// Payable aging, when supplied.
    pub payables: Option<AgingResult>,
    /// Tax summary, when invoice items were supplied.
    pub tax: Option<TaxSummary>,
    /// Ratio set.
    pub ratios: Vec<RatioResult>,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
    /// `total_assets - total_liabilities_and_equity`.
    pub balance_difference: Decimal,
}
