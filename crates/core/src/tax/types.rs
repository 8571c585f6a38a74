//! Invoice and tax summary types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{Overflow, try_sub};

/// A single invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Line description.
    pub description: String,
    /// Quantity (must not be negative).
    pub quantity: Decimal,
    /// Price per unit before discount.
    pub unit_price: Decimal,
    /// Discount in percent, within `[0, 100]`.
    #[serde(default)]
    pub discount_pct: Decimal,
    /// Tax rate in percent (must not be negative).
    pub tax_rate_pct: Decimal,
}

impl InvoiceLineItem {
    /// Line amount after discount, before tax.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the amount leaves the decimal range.
    pub fn taxable_value(&self) -> Result<Decimal, Overflow> {
        const WHAT: &str = "taxable value";

        let gross = self
            .quantity
            .checked_mul(self.unit_price)
            .ok_or(Overflow(WHAT))?;
        let discount = percent_share(gross, self.discount_pct).ok_or(Overflow(WHAT))?;
        try_sub(gross, discount, WHAT)
    }

    /// Tax on the taxable value.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the amount leaves the decimal range.
    pub fn tax_amount(&self) -> Result<Decimal, Overflow> {
        percent_share(self.taxable_value()?, self.tax_rate_pct).ok_or(Overflow("tax amount"))
    }
}

/// `amount * pct / 100`, or `None` on overflow.
fn percent_share(amount: Decimal, pct: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(pct)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
}

/// An untaxed flat charge added once to the invoice total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCharge {
    /// Charge label (e.g. "Transport", "Packaging").
    pub label: String,
    /// Charge amount.
    pub amount: Decimal,
}

impl AdditionalCharge {
    /// Creates a charge.
    #[must_use]
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Computed values of one invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxedLine {
    /// Line description.
    pub description: String,
    /// Tax rate in percent.
    pub rate: Decimal,
    /// Amount after discount.
    pub taxable_value: Decimal,
    /// Tax on the taxable value.
    pub tax_amount: Decimal,
}

/// Lines sharing one tax rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxGroup {
    /// Tax rate in percent.
    pub rate: Decimal,
    /// Sum of taxable values at this rate.
    pub taxable_total: Decimal,
    /// Sum of tax amounts at this rate.
    pub tax_total: Decimal,
    /// Number of lines at this rate.
    pub item_count: usize,
}

/// Kind of supply, which decides how tax is split between authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Seller and buyer in the same state: half central, half state tax.
    IntraState,
    /// Seller and buyer in different states: one integrated tax.
    InterState,
}

/// Tax split between authorities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSplit {
    /// Central share (intra-state supply).
    pub central: Decimal,
    /// State share (intra-state supply).
    pub state: Decimal,
    /// Integrated tax (inter-state supply).
    pub integrated: Decimal,
}

impl TaxSplit {
    /// Splits a tax amount. The two intra-state halves always add back up
    /// to `tax` exactly.
    #[must_use]
    pub fn of(tax: Decimal, supply: SupplyType) -> Self {
        match supply {
            SupplyType::IntraState => {
                let central = tax / Decimal::TWO;
                Self {
                    central,
                    state: tax - central,
                    integrated: Decimal::ZERO,
                }
            }
            SupplyType::InterState => Self {
                integrated: tax,
                ..Self::default()
            },
        }
    }

    /// Sum of all shares.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.central + self.state + self.integrated
    }
}

impl TaxGroup {
    /// Splits this group's tax.
    #[must_use]
    pub fn split(&self, supply: SupplyType) -> TaxSplit {
        TaxSplit::of(self.tax_total, supply)
    }
}

/// Multi-rate tax summary of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Per-line values in input order.
    pub lines: Vec<TaxedLine>,
    /// One group per distinct rate, ascending by rate.
    pub groups: Vec<TaxGroup>,
    /// Sum of taxable values.
    pub grand_subtotal: Decimal,
    /// Sum of group tax totals.
    pub grand_tax: Decimal,
    /// Sum of flat charges.
    pub additional_charges_total: Decimal,
    /// `grand_subtotal + grand_tax + additional_charges_total`.
    pub grand_total: Decimal,
}

impl TaxSummary {
    /// Group for a rate, compared numerically (`5` matches `5.00`).
    #[must_use]
    pub fn group(&self, rate: Decimal) -> Option<&TaxGroup> {
        self.groups.iter().find(|g| g.rate == rate)
    }

    /// Splits the invoice's total tax.
    #[must_use]
    pub fn split(&self, supply: SupplyType) -> TaxSplit {
        TaxSplit::of(self.grand_tax, supply)
    }
}
