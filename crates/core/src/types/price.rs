//! Price conversion for the payment gateway.
//!
//! Prices travel as major units (dollars). Gateways charge in the currency's
//! minor unit (cents), so the amount is `price * 100` truncated toward zero.
//! Decimal arithmetic keeps `19.99` at exactly `1999`; binary floats would
//! produce `1998.999...` and truncate to `1998`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Errors converting a price to a minor-unit amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmountError {
    /// Price was zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The minor-unit amount does not fit in an `i64`.
    #[error("price is too large")]
    Overflow,
}

/// Convert a major-unit price to an integer minor-unit amount.
///
/// # Errors
///
/// Returns [`AmountError::NotPositive`] if the price is `<= 0` or truncates to
/// zero minor units, and [`AmountError::Overflow`] if the amount does not fit
/// in an `i64`.
///
/// # Examples
///
/// ```
/// use bistro_core::to_minor_units;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_minor_units(Decimal::new(1999, 2)), Ok(1999));
/// assert_eq!(to_minor_units(Decimal::new(10_005, 3)), Ok(1000));
/// ```
pub fn to_minor_units(price: Decimal) -> Result<i64, AmountError> {
    if price <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }

    let cents = price
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(AmountError::Overflow)?
        .trunc();

    match cents.to_i64() {
        Some(0) => Err(AmountError::NotPositive),
        Some(amount) => Ok(amount),
        None => Err(AmountError::Overflow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_cents() {
        assert_eq!(to_minor_units(Decimal::new(1999, 2)), Ok(1999));
        assert_eq!(to_minor_units(Decimal::new(5, 0)), Ok(500));
    }

    #[test]
    fn test_truncates_fractional_cents() {
        // 12.349 -> 1234.9 -> 1234
        assert_eq!(to_minor_units(Decimal::new(12_349, 3)), Ok(1234));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(to_minor_units(Decimal::ZERO), Err(AmountError::NotPositive));
        assert_eq!(
            to_minor_units(Decimal::new(-1, 0)),
            Err(AmountError::NotPositive)
        );
        // Half a cent truncates to nothing
        assert_eq!(
            to_minor_units(Decimal::new(5, 3)),
            Err(AmountError::NotPositive)
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(to_minor_units(Decimal::MAX), Err(AmountError::Overflow));
    }
}
