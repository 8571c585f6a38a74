//! Financial statement aggregation engine for Finstat.
//!
//! This crate contains pure computation with ZERO I/O dependencies.
//! Callers hand in raw line items and receive structured decimal results;
//! formatting and rendering stay with the caller.
//!
//! # Modules
//!
//! - `statement` - Balance sheet model, rollups, period comparison, assembly
//! - `aging` - Receivable/payable aging buckets
//! - `tax` - Multi-rate invoice tax summaries
//! - `ratio` - Liquidity and leverage ratios

pub mod aging;
pub mod numeric;
pub mod ratio;
pub mod statement;
pub mod tax;

pub use aging::{bucket_for_due_date, classify_aging};
pub use ratio::compute_ratios;
pub use statement::{aggregate_snapshot, assemble_statement, compare_periods};
pub use tax::summarize_tax;
