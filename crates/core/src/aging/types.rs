//! Aging data types.

use chrono::NaiveDate;
use finstat_shared::types::OpenItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{Overflow, try_add, try_sum};

/// Elapsed-time bucket of an outstanding amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due, or due today.
    Current,
    /// Up to 30 days past due (with default thresholds).
    #[serde(rename = "overdue_30")]
    Overdue30,
    /// 31 to 60 days past due (with default thresholds).
    #[serde(rename = "overdue_60")]
    Overdue60,
    /// More than 60 days past due (with default thresholds).
    #[serde(rename = "overdue_90_plus")]
    Overdue90Plus,
}

impl AgingBucket {
    /// All buckets from youngest to oldest.
    pub const ALL: [Self; 4] = [
        Self::Current,
        Self::Overdue30,
        Self::Overdue60,
        Self::Overdue90Plus,
    ];

    /// Stable machine name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Overdue30 => "overdue_30",
            Self::Overdue60 => "overdue_60",
            Self::Overdue90Plus => "overdue_90_plus",
        }
    }
}

impl std::fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amounts per aging bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingBreakdown {
    /// Not yet due.
    #[serde(default)]
    pub current: Decimal,
    /// First overdue bucket.
    #[serde(default)]
    pub overdue_30: Decimal,
    /// Second overdue bucket.
    #[serde(default)]
    pub overdue_60: Decimal,
    /// Oldest bucket.
    #[serde(default)]
    pub overdue_90_plus: Decimal,
}

impl AgingBreakdown {
    /// Amount of one bucket.
    #[must_use]
    pub const fn get(&self, bucket: AgingBucket) -> Decimal {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Overdue30 => self.overdue_30,
            AgingBucket::Overdue60 => self.overdue_60,
            AgingBucket::Overdue90Plus => self.overdue_90_plus,
        }
    }

    /// Adds an amount to one bucket.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the bucket amount leaves the decimal range; the
    /// breakdown is left unchanged.
    pub fn add(&mut self, bucket: AgingBucket, amount: Decimal) -> Result<(), Overflow> {
        let slot = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Overdue30 => &mut self.overdue_30,
            AgingBucket::Overdue60 => &mut self.overdue_60,
            AgingBucket::Overdue90Plus => &mut self.overdue_90_plus,
        };
        *slot = try_add(*slot, amount, bucket.as_str())?;
        Ok(())
    }

    /// Sum of the four buckets.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the sum leaves the decimal range.
    pub fn sum(&self) -> Result<Decimal, Overflow> {
        try_sum(AgingBucket::ALL.map(|bucket| self.get(bucket)), "bucket sum")
    }
}

/// Share of the total held by each bucket, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingPercentages {
    /// Not yet due.
    pub current: Decimal,
    /// First overdue bucket.
    pub overdue_30: Decimal,
    /// Second overdue bucket.
    pub overdue_60: Decimal,
    /// Oldest bucket.
    pub overdue_90_plus: Decimal,
}

/// An outstanding receivable or payable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    /// Document identifier, when the data source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OpenItemId>,
    /// Document reference (invoice number, bill number).
    pub reference: String,
    /// Outstanding amount.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
}

/// An open item with its computed age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgedItem {
    /// Document identifier, copied from the open item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OpenItemId>,
    /// Document reference.
    pub reference: String,
    /// Outstanding amount.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
    /// Days elapsed since the due date (negative when not yet due).
    pub days_past_due: i64,
    /// Assigned bucket.
    pub bucket: AgingBucket,
}

/// Open items bucketed as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgedItems {
    /// Date the ages are measured at.
    pub as_of: NaiveDate,
    /// Sum of all item amounts.
    pub total: Decimal,
    /// Bucket amounts.
    pub breakdown: AgingBreakdown,
    /// Per-item ages in input order.
    pub items: Vec<AgedItem>,
}

/// Where a request's aging data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AgingSource {
    /// Buckets already computed by the data source.
    Breakdown {
        /// Owning total (receivable or payable total).
        total: Decimal,
        /// Bucket amounts.
        breakdown: AgingBreakdown,
    },
    /// Individual documents to bucket by due date.
    OpenItems {
        /// Outstanding documents.
        items: Vec<OpenItem>,
    },
}

/// Validated aging breakdown with bucket shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingResult {
    /// Owning total.
    pub total: Decimal,
    /// Bucket amounts.
    pub breakdown: AgingBreakdown,
    /// Sum of the buckets.
    pub bucket_sum: Decimal,
    /// `bucket_sum - total`.
    pub difference: Decimal,
    /// Whether `|difference|` is within the configured tolerance.
    pub reconciles: bool,
    /// Bucket shares of the total; all zero when the total is zero.
    pub percentages: AgingPercentages,
    /// Per-item ages, when the breakdown was built from open items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AgedItem>,
}
