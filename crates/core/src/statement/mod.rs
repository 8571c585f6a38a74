//! Balance sheet statements.
//!
//! This module provides the balance sheet model and its pure computations:
//! - Rollup of line items into section and grand totals
//! - Period-over-period comparison
//! - Statement assembly with aging, tax and ratios

pub mod assembler;
pub mod comparison;
pub mod error;
pub mod rollup;
pub mod types;


pub use assembler::{StatementAssembler, assemble_statement};
pub use comparison::compare_periods;
pub use error::StatementError;
pub use rollup::{aggregate_snapshot, sum_items};
pub use types::*;
