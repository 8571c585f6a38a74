//! Financial ratios with qualitative status.

pub mod calculator;
pub mod types;

pub use calculator::{RatioCalculator, compute_ratios};
pub use types::{RatioKind, RatioResult, RatioStatus};
