//! Receivable and payable aging.
//!
//! Buckets outstanding amounts by days past due and validates pre-bucketed
//! breakdowns against their owning totals.

pub mod classifier;
pub mod error;
pub mod types;


pub use classifier::{
    AgingClassifier, age_open_items, bucket_for_due_date, classify_aging, parse_date,
};
pub use error::AgingError;
pub use types::{
    AgedItem, AgedItems, AgingBreakdown, AgingBucket, AgingPercentages, AgingResult, AgingSource,
    OpenItem,
};
