//! Decimal helpers shared by the engine modules.
//!
//! Every division and every sum of caller-supplied amounts in the engine goes
//! through these helpers, so a zero denominator or an out-of-range result
//! becomes a value or an error instead of a panic.

use rust_decimal::Decimal;
use thiserror::Error;

/// Decimal places kept for percentages.
pub const PERCENT_DP: u32 = 2;

/// Decimal places kept for ratios.
pub const RATIO_DP: u32 = 4;

/// An arithmetic result fell outside the range of `Decimal`.
///
/// Carries the name of the quantity being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} exceeds the representable decimal range")]
pub struct Overflow(pub &'static str);

/// Sums values, failing instead of panicking when the total leaves the
/// decimal range. An empty input sums to zero.
///
/// # Errors
///
/// Returns `Overflow(what)` if any partial sum overflows.
pub fn try_sum<I>(values: I, what: &'static str) -> Result<Decimal, Overflow>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| try_add(acc, value, what))
}

/// Returns `a + b`.
///
/// # Errors
///
/// Returns `Overflow(what)` if the sum overflows.
pub fn try_add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, Overflow> {
    a.checked_add(b).ok_or(Overflow(what))
}

/// Returns `a - b`.
///
/// # Errors
///
/// Returns `Overflow(what)` if the difference overflows.
pub fn try_sub(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, Overflow> {
    a.checked_sub(b).ok_or(Overflow(what))
}

/// Returns `part / whole * 100`, or `None` when `whole` is zero.
///
/// # Errors
///
/// Returns `Overflow` if the percentage does not fit in a `Decimal`.
pub fn percent_of(part: Decimal, whole: Decimal) -> Result<Option<Decimal>, Overflow> {
    if whole.is_zero() {
        return Ok(None);
    }

    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| Some(percent.round_dp(PERCENT_DP)))
        .ok_or(Overflow("percentage"))
}

/// Returns `numerator / denominator`, or `None` when the denominator is zero.
///
/// # Errors
///
/// Returns `Overflow(what)` if the quotient does not fit in a `Decimal`.
pub fn ratio_of(
    numerator: Decimal,
    denominator: Decimal,
    what: &'static str,
) -> Result<Option<Decimal>, Overflow> {
    if denominator.is_zero() {
        return Ok(None);
    }

    numerator
        .checked_div(denominator)
        .map(|ratio| Some(ratio.round_dp(RATIO_DP)))
        .ok_or(Overflow(what))
}

/// Returns true when `a` and `b` differ by at most `tolerance`.
///
/// A gap too large to represent is never within tolerance.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|difference| difference.abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(25), dec!(200)), Ok(Some(dec!(12.50))));
        assert_eq!(percent_of(dec!(1), dec!(3)), Ok(Some(dec!(33.33))));
        assert_eq!(percent_of(dec!(-50), dec!(100)), Ok(Some(dec!(-50))));
    }

    #[test]
    fn test_percent_of_zero_whole_is_none() {
        assert_eq!(percent_of(dec!(10), Decimal::ZERO), Ok(None));
        assert_eq!(percent_of(Decimal::ZERO, Decimal::ZERO), Ok(None));
    }

    #[test]
    fn test_percent_of_out_of_range() {
        assert_eq!(
            percent_of(Decimal::MAX, dec!(0.5)),
            Err(Overflow("percentage"))
        );
    }

    #[test]
    fn test_ratio_of() {
        assert_eq!(ratio_of(dec!(2), dec!(3), "ratio"), Ok(Some(dec!(0.6667))));
        assert_eq!(ratio_of(dec!(5), Decimal::ZERO, "ratio"), Ok(None));
        assert_eq!(
            ratio_of(Decimal::MAX, dec!(0.001), "ratio"),
            Err(Overflow("ratio"))
        );
    }

    #[test]
    fn test_try_sum() {
        assert_eq!(try_sum(std::iter::empty(), "total"), Ok(Decimal::ZERO));
        assert_eq!(try_sum([dec!(0.10), dec!(0.20)], "total"), Ok(dec!(0.30)));
        assert_eq!(
            try_sum([Decimal::MAX, Decimal::MAX], "total"),
            Err(Overflow("total"))
        );
        // A later negative amount does not rescue an overflowed partial sum
        assert!(try_sum([Decimal::MAX, Decimal::ONE, Decimal::MIN], "total").is_err());
    }

    #[test]
    fn test_try_sub_out_of_range() {
        assert_eq!(
            try_sub(Decimal::MAX, Decimal::MIN, "gap"),
            Err(Overflow("gap"))
        );
        assert_eq!(try_sub(dec!(5), dec!(7), "gap"), Ok(dec!(-2)));
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(dec!(100.00), dec!(100.01), dec!(0.01)));
        assert!(within_tolerance(dec!(100.01), dec!(100.00), dec!(0.01)));
        assert!(!within_tolerance(dec!(100.00), dec!(100.02), dec!(0.01)));
        assert!(within_tolerance(dec!(5), dec!(5), Decimal::ZERO));
        assert!(!within_tolerance(Decimal::MAX, Decimal::MIN, Decimal::MAX));
    }
}
