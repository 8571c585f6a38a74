//! Multi-rate tax summarization.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::error::TaxError;
use super::types::{AdditionalCharge, InvoiceLineItem, TaxGroup, TaxSummary, TaxedLine};
use crate::numeric::{Overflow, try_add, try_sum};

/// Validates a single invoice line.
///
/// # Errors
///
/// Returns the first rule the line breaks: negative quantity, negative tax
/// rate, or a discount outside `[0, 100]`.
pub fn validate_line(line: usize, item: &InvoiceLineItem) -> Result<(), TaxError> {
    if item.quantity < Decimal::ZERO {
        return Err(TaxError::NegativeQuantity {
            line,
            quantity: item.quantity,
        });
    }

    if item.tax_rate_pct < Decimal::ZERO {
        return Err(TaxError::NegativeTaxRate {
            line,
            rate: item.tax_rate_pct,
        });
    }

    if item.discount_pct < Decimal::ZERO || item.discount_pct > Decimal::ONE_HUNDRED {
        return Err(TaxError::DiscountOutOfRange {
            line,
            discount: item.discount_pct,
        });
    }

    Ok(())
}

/// Groups invoice lines by tax rate and totals them.
///
/// Flat charges are added once to the grand total and are not taxed.
///
/// # Errors
///
/// Returns a `TaxError` for the first invalid line; nothing is coerced.
/// Amounts that leave the decimal range yield `TaxError::Overflow` for the
/// line that pushed them out, or `TaxError::TotalOverflow` past the lines.
pub fn summarize_tax(
    items: &[InvoiceLineItem],
    additional_charges: &[AdditionalCharge],
) -> Result<TaxSummary, TaxError> {
    for (line, item) in items.iter().enumerate() {
        validate_line(line, item)?;
    }

    let lines = items
        .iter()
        .enumerate()
        .map(|(line, item)| {
            let overflow = |_: Overflow| TaxError::Overflow { line };
            Ok(TaxedLine {
                description: item.description.clone(),
                rate: item.tax_rate_pct.normalize(),
                taxable_value: item.taxable_value().map_err(overflow)?,
                tax_amount: item.tax_amount().map_err(overflow)?,
            })
        })
        .collect::<Result<Vec<_>, TaxError>>()?;

    // Decimal ordering is numeric, so 5 and 5.00 share a key.
    let mut by_rate: BTreeMap<Decimal, TaxGroup> = BTreeMap::new();
    let mut grand_subtotal = Decimal::ZERO;
    for (index, line) in lines.iter().enumerate() {
        let overflow = |_: Overflow| TaxError::Overflow { line: index };

        let group = by_rate.entry(line.rate).or_insert_with(|| TaxGroup {
            rate: line.rate,
            taxable_total: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            item_count: 0,
        });
        group.taxable_total =
            try_add(group.taxable_total, line.taxable_value, "taxable total").map_err(overflow)?;
        group.tax_total = try_add(group.tax_total, line.tax_amount, "tax total").map_err(overflow)?;
        group.item_count += 1;

        grand_subtotal =
            try_add(grand_subtotal, line.taxable_value, "subtotal").map_err(overflow)?;
    }

    let groups: Vec<TaxGroup> = by_rate.into_values().collect();
    let total_overflow = |_: Overflow| TaxError::TotalOverflow;
    let grand_tax = try_sum(groups.iter().map(|g| g.tax_total), "tax").map_err(total_overflow)?;
    let additional_charges_total =
        try_sum(additional_charges.iter().map(|c| c.amount), "charges").map_err(total_overflow)?;
    let grand_total = try_add(grand_subtotal, grand_tax, "grand total")
        .and_then(|total| try_add(total, additional_charges_total, "grand total"))
        .map_err(total_overflow)?;

    debug!(
        lines = lines.len(),
        rates = groups.len(),
        %grand_subtotal,
        %grand_tax,
        %grand_total,
        "Summarized invoice tax"
    );

    Ok(TaxSummary {
        lines,
        groups,
        grand_subtotal,
        grand_tax,
        additional_charges_total,
        grand_total,
    })
}
