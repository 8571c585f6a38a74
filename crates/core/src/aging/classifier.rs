//! Aging classification and breakdown validation.

use chrono::NaiveDate;
use finstat_shared::AgingConfig;
use rust_decimal::Decimal;
use tracing::warn;

use super::error::AgingError;
use super::types::{
    AgedItem, AgedItems, AgingBreakdown, AgingBucket, AgingPercentages, AgingResult, AgingSource,
    OpenItem,
};
use crate::numeric::{Overflow, percent_of, try_add, try_sub, within_tolerance};

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `AgingError::MalformedDate` if the input is not a valid date.
pub fn parse_date(input: &str) -> Result<NaiveDate, AgingError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|err| AgingError::MalformedDate {
        input: input.to_string(),
        reason: err.to_string(),
    })
}

/// Buckets a due date by the days elapsed until `as_of`.
///
/// With the default configuration: due today or later is `current`,
/// 1-30 days `overdue_30`, 31-60 days `overdue_60`, 61 days and beyond
/// `overdue_90_plus`.
#[must_use]
pub fn bucket_for_due_date(
    due_date: NaiveDate,
    as_of: NaiveDate,
    config: &AgingConfig,
) -> AgingBucket {
    bucket_for_days((as_of - due_date).num_days(), config)
}

fn bucket_for_days(days_past_due: i64, config: &AgingConfig) -> AgingBucket {
    if days_past_due <= 0 {
        AgingBucket::Current
    } else if days_past_due <= i64::from(config.overdue_30_max_days) {
        AgingBucket::Overdue30
    } else if days_past_due <= i64::from(config.overdue_60_max_days) {
        AgingBucket::Overdue60
    } else {
        AgingBucket::Overdue90Plus
    }
}

/// Validates a pre-bucketed breakdown against its owning total.
///
/// A breakdown that does not reconcile is reported, not rejected.
///
/// # Errors
///
/// Returns `AgingError::Overflow` if the bucket sum, the difference or a
/// bucket share leaves the decimal range.
pub fn classify_aging(
    total: Decimal,
    breakdown: &AgingBreakdown,
    config: &AgingConfig,
) -> Result<AgingResult, AgingError> {
    let bucket_sum = breakdown.sum()?;
    let difference = try_sub(bucket_sum, total, "aging difference")?;
    let reconciles = within_tolerance(bucket_sum, total, config.tolerance);

    if !reconciles {
        warn!(
            %total,
            %bucket_sum,
            %difference,
            tolerance = %config.tolerance,
            "Aging buckets do not reconcile with total"
        );
    }

    let share = |amount| -> Result<Decimal, Overflow> {
        Ok(percent_of(amount, total)?.unwrap_or(Decimal::ZERO))
    };

    Ok(AgingResult {
        total,
        breakdown: *breakdown,
        bucket_sum,
        difference,
        reconciles,
        percentages: AgingPercentages {
            current: share(breakdown.current)?,
            overdue_30: share(breakdown.overdue_30)?,
            overdue_60: share(breakdown.overdue_60)?,
            overdue_90_plus: share(breakdown.overdue_90_plus)?,
        },
        items: Vec::new(),
    })
}

/// Buckets individual open items as of a date.
///
/// # Errors
///
/// Returns `AgingError::Overflow` if the item total or a bucket amount
/// leaves the decimal range.
pub fn age_open_items(
    items: &[OpenItem],
    as_of: NaiveDate,
    config: &AgingConfig,
) -> Result<AgedItems, AgingError> {
    let mut breakdown = AgingBreakdown::default();
    let mut total = Decimal::ZERO;
    let mut aged = Vec::with_capacity(items.len());

    for item in items {
        let days_past_due = (as_of - item.due_date).num_days();
        let bucket = bucket_for_days(days_past_due, config);
        breakdown.add(bucket, item.amount)?;
        total = try_add(total, item.amount, "open item total")?;

        aged.push(AgedItem {
            id: item.id,
            reference: item.reference.clone(),
            amount: item.amount,
            due_date: item.due_date,
            days_past_due,
            bucket,
        });
    }

    Ok(AgedItems {
        as_of,
        total,
        breakdown,
        items: aged,
    })
}

/// Aging classifier bound to a validated configuration.
#[derive(Debug, Clone, Default)]
pub struct AgingClassifier {
    config: AgingConfig,
}

impl AgingClassifier {
    /// Creates a classifier.
    ///
    /// # Errors
    ///
    /// Returns `AgingError::InvalidConfig` if the tolerance is negative or
    /// the day thresholds are not `0 < overdue_30_max_days < overdue_60_max_days`.
    pub fn new(config: AgingConfig) -> Result<Self, AgingError> {
        config
            .validate()
            .map_err(|err| AgingError::InvalidConfig(err.message().to_string()))?;
        Ok(Self { config })
    }

    /// Buckets a due date.
    #[must_use]
    pub fn bucket(&self, due_date: NaiveDate, as_of: NaiveDate) -> AgingBucket {
        bucket_for_due_date(due_date, as_of, &self.config)
    }

    /// Validates a pre-bucketed breakdown.
    ///
    /// # Errors
    ///
    /// Returns `AgingError::Overflow` for out-of-range amounts.
    pub fn classify(
        &self,
        total: Decimal,
        breakdown: &AgingBreakdown,
    ) -> Result<AgingResult, AgingError> {
        classify_aging(total, breakdown, &self.config)
    }

    /// Ages open items and validates the resulting breakdown.
    ///
    /// # Errors
    ///
    /// Returns `AgingError::Overflow` for out-of-range amounts.
    pub fn classify_items(
        &self,
        items: &[OpenItem],
        as_of: NaiveDate,
    ) -> Result<AgingResult, AgingError> {
        let aged = age_open_items(items, as_of, &self.config)?;
        let mut result = self.classify(aged.total, &aged.breakdown)?;
        result.items = aged.items;
        Ok(result)
    }

    /// Resolves an aging source as of a date.
    ///
    /// # Errors
    ///
    /// Returns `AgingError::Overflow` for out-of-range amounts.
    pub fn resolve(
        &self,
        source: &AgingSource,
        as_of: NaiveDate,
    ) -> Result<AgingResult, AgingError> {
        match source {
            AgingSource::Breakdown { total, breakdown } => self.classify(*total, breakdown),
            AgingSource::OpenItems { items } => self.classify_items(items, as_of),
        }
    }
}
