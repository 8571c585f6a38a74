//! Invoice tax summaries.
//!
//! Groups invoice lines by tax rate, computing the taxable base and tax per
//! rate, and splits tax between authorities by supply type.

pub mod error;
pub mod summarizer;
pub mod types;


pub use error::TaxError;
pub use summarizer::{summarize_tax, validate_line};
pub use types::{
    AdditionalCharge, InvoiceLineItem, SupplyType, TaxGroup, TaxSplit, TaxSummary, TaxedLine,
};
