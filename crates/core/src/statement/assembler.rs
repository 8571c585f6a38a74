//! Statement assembly.
//!
//! One stateless pass per request: classify aging, aggregate totals, compare
//! periods, derive tax and ratios, then report whether the sheet balances.

use chrono::NaiveDate;
use finstat_shared::EngineConfig;
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::comparison::compare_periods;
use super::error::StatementError;
use super::rollup::aggregate_snapshot;
use super::types::{BalanceSheetSnapshot, PeriodSet, Statement, StatementRequest};
use crate::aging::{AgingClassifier, AgingResult, AgingSource};
use crate::numeric::within_tolerance;
use crate::ratio::RatioCalculator;
use crate::tax::summarize_tax;

/// Assembles statements with a fixed engine configuration.
#[derive(Debug, Clone)]
pub struct StatementAssembler {
    balance_tolerance: Decimal,
    aging: AgingClassifier,
    ratios: RatioCalculator,
}

impl Default for StatementAssembler {
    fn default() -> Self {
        Self {
            balance_tolerance: EngineConfig::default().balance_tolerance,
            aging: AgingClassifier::default(),
            ratios: RatioCalculator::default(),
        }
    }
}

impl StatementAssembler {
    /// Creates an assembler.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::InvalidConfig` if a tolerance is negative,
    /// the aging thresholds are misordered, or the current ratio band is
    /// inverted.
    pub fn new(config: EngineConfig) -> Result<Self, StatementError> {
        config
            .validate()
            .map_err(|err| StatementError::InvalidConfig(err.message().to_string()))?;

        Ok(Self {
            balance_tolerance: config.balance_tolerance,
            aging: AgingClassifier::new(config.aging)?,
            ratios: RatioCalculator::new(config.ratios),
        })
    }

    /// Assembles a statement from a balance sheet and an optional comparison.
    ///
    /// Zero denominators resolve to defined sentinels.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::Overflow` if a total, difference or ratio
    /// leaves the decimal range.
    #[instrument(skip_all, fields(as_of = %snapshot.as_of))]
    pub fn assemble_snapshot(
        &self,
        snapshot: &BalanceSheetSnapshot,
        comparison: Option<&BalanceSheetSnapshot>,
    ) -> Result<Statement, StatementError> {
        let totals = aggregate_snapshot(snapshot)?;
        let comparison = comparison
            .map(|prior| compare_periods(snapshot, prior))
            .transpose()?;
        let ratios = self.ratios.compute(&totals)?;

        let balance_difference = totals.balance_difference()?;
        let is_balanced = within_tolerance(
            totals.total_assets,
            totals.total_liabilities_and_equity,
            self.balance_tolerance,
        );

        if is_balanced {
            debug!(
                total_assets = %totals.total_assets,
                total_liabilities_and_equity = %totals.total_liabilities_and_equity,
                "Balance sheet balances"
            );
        } else {
            warn!(
                total_assets = %totals.total_assets,
                total_liabilities_and_equity = %totals.total_liabilities_and_equity,
                %balance_difference,
                "Balance sheet does not balance"
            );
        }

        Ok(Statement {
            as_of: snapshot.as_of,
            totals,
            comparison,
            receivables: None,
            payables: None,
            tax: None,
            ratios,
            is_balanced,
            balance_difference,
        })
    }

    /// Assembles a statement with optional aging and invoice data.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::Tax` if an invoice line is invalid, and
    /// `StatementError::Aging` or `StatementError::Overflow` for amounts
    /// outside the decimal range.
    #[instrument(skip_all, fields(as_of = %request.snapshot.as_of))]
    pub fn assemble(&self, request: &StatementRequest) -> Result<Statement, StatementError> {
        let as_of = request.snapshot.as_of;
        let receivables = self.age(request.receivables.as_ref(), as_of)?;
        let payables = self.age(request.payables.as_ref(), as_of)?;

        let tax = request
            .invoice
            .as_ref()
            .map(|invoice| summarize_tax(&invoice.items, &invoice.additional_charges))
            .transpose()?;

        let mut statement =
            self.assemble_snapshot(&request.snapshot, request.comparison.as_ref())?;
        statement.receivables = receivables;
        statement.payables = payables;
        statement.tax = tax;

        Ok(statement)
    }

    /// Assembles the statement of one period, optionally compared to another.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::PeriodNotFound` for an unknown period id and
    /// `StatementError::Overflow` for out-of-range amounts.
    pub fn assemble_period(
        &self,
        periods: &PeriodSet,
        base_id: &str,
        comparison_id: Option<&str>,
    ) -> Result<Statement, StatementError> {
        let lookup = |id: &str| {
            periods
                .get(id)
                .ok_or_else(|| StatementError::PeriodNotFound(id.to_string()))
        };

        let base = lookup(base_id)?;
        let comparison = comparison_id.map(lookup).transpose()?;

        self.assemble_snapshot(&base.data, comparison.map(|p| &p.data))
    }

    /// Assembles many requests in parallel.
    ///
    /// Each request succeeds or fails on its own; results keep input order.
    #[must_use]
    pub fn assemble_batch(
        &self,
        requests: &[StatementRequest],
    ) -> Vec<Result<Statement, StatementError>> {
        let results: Vec<_> = requests
            .par_iter()
            .map(|request| self.assemble(request))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        debug!(requests = requests.len(), failed, "Assembled statement batch");

        results
    }

    fn age(
        &self,
        source: Option<&AgingSource>,
        as_of: NaiveDate,
    ) -> Result<Option<AgingResult>, StatementError> {
        Ok(source
            .map(|source| self.aging.resolve(source, as_of))
            .transpose()?)
    }
}

/// Assembles a statement with the default engine configuration.
///
/// # Errors
///
/// Returns `StatementError::Overflow` if a total, difference or ratio leaves
/// the decimal range.
pub fn assemble_statement(
    snapshot: &BalanceSheetSnapshot,
    comparison: Option<&BalanceSheetSnapshot>,
) -> Result<Statement, StatementError> {
    StatementAssembler::default().assemble_snapshot(snapshot, comparison)
}
