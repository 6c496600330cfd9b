//! Decimal constants and conversions to reals.
//!
//! Rule constants are plain `Decimal`s; the residual path works in `f64`.
//! Crossing into `f64` goes through the shortest decimal string so that the
//! conversion is correctly rounded and reproducible.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Non-negative decimal `units × 10^-scale`, usable in constants.
pub const fn fixed(units: u32, scale: u32) -> Decimal {
    Decimal::from_parts(units, 0, 0, false, scale)
}

/// Convert a decimal amount to the nearest `f64`.
pub fn to_real(value: Decimal) -> f64 {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| value.to_f64().unwrap_or(0.0))
}

/// Two-digit cents component of a non-negative amount, truncated.
///
/// `148.49` yields `49`; `10.495` yields `49` as well.
pub fn cents_digits(value: Decimal) -> i64 {
    (value.fract() * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_constants() {
        assert_eq!(fixed(58, 2), Decimal::new(58, 2));
        assert_eq!(fixed(1500, 0), Decimal::from(1500));
    }

    #[test]
    fn real_conversion_uses_shortest_form() {
        assert_eq!(to_real(Decimal::new(14849, 2)), 148.49);
        assert_eq!(to_real(Decimal::new(1, 1)), 0.1);
    }

    #[test]
    fn cents_digits_truncates() {
        assert_eq!(cents_digits(Decimal::new(14849, 2)), 49);
        assert_eq!(cents_digits(Decimal::new(10495, 3)), 49);
        assert_eq!(cents_digits(Decimal::new(99, 2)), 99);
        assert_eq!(cents_digits(Decimal::new(100, 0)), 0);
    }
}
