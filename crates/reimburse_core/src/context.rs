//! Decimal arithmetic in the legacy calculation context.
//!
//! Every operation computes its exact result and then rounds it to
//! [`PRECISION`] significant digits, ties to even. Quotients such as
//! `1 / days` therefore carry the same last-digit rounding into later products
//! that the legacy system does, which matters whenever a component lands near
//! a half cent. Values convert back to [`Decimal`] only through
//! [`ContextDecimal::round_cents`].

use crate::errors::{ReimburseError, Result};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU32;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Significant digits kept after every operation
pub const PRECISION: u32 = 28;

/// `coefficient × 10^exponent`, at most [`PRECISION`] digits after any
/// arithmetic (values taken from inputs are kept exact).
#[derive(Debug, Clone)]
pub struct ContextDecimal {
    coefficient: BigInt,
    exponent: i64,
}

fn pow10(n: u64) -> BigInt {
    let mut value = BigInt::one();
    for _ in 0..n {
        value *= 10u8;
    }
    value
}

fn digit_count(value: &BigInt) -> u64 {
    value.magnitude().to_string().len() as u64
}

impl ContextDecimal {
    pub fn zero() -> Self {
        Self {
            coefficient: BigInt::zero(),
            exponent: 0,
        }
    }

    pub fn one() -> Self {
        Self {
            coefficient: BigInt::one(),
            exponent: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Exact value of a finite real, spelled by its shortest round-trip form.
    pub fn from_real(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ReimburseError::NonFiniteResidual(value));
        }
        let malformed =
            || ReimburseError::InvalidModel(format!("value {value} has no decimal form"));

        let text = format!("{value:e}");
        let (mantissa, exponent) = text.split_once('e').ok_or_else(malformed)?;
        let exponent: i64 = exponent.parse().map_err(|_| malformed())?;
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let coefficient: BigInt = format!("{whole}{fraction}")
            .parse()
            .map_err(|_| malformed())?;

        Ok(Self {
            coefficient,
            exponent: exponent - fraction.len() as i64,
        }
        .normalized())
    }

    /// `numerator / denominator × 10^exponent` rounded to [`PRECISION`]
    /// digits, ties to even. `denominator` must be positive.
    fn from_ratio(numerator: BigInt, denominator: &BigInt, exponent: i64) -> Self {
        if numerator.is_zero() {
            return Self::zero();
        }
        let negative = numerator.is_negative();
        let mut numerator = numerator.abs();
        let mut exponent = exponent;

        // Widen until the integer quotient has more digits than we keep.
        let wanted = i64::from(PRECISION) + 1;
        let spare = digit_count(&numerator) as i64 - digit_count(denominator) as i64;
        if spare < wanted {
            let shift = (wanted - spare) as u64;
            numerator *= pow10(shift);
            exponent -= shift as i64;
        }

        let quotient = &numerator / denominator;
        let remainder = &numerator % denominator;

        let dropped = digit_count(&quotient).saturating_sub(u64::from(PRECISION));
        let unit = pow10(dropped);
        let mut coefficient = &quotient / &unit;
        let discarded = &quotient % &unit;
        exponent += dropped as i64;

        // Discarded fraction is (discarded + remainder / denominator) / unit.
        let twice = (discarded * denominator + remainder) * 2u8;
        let half_way = unit * denominator;
        let round_up = match twice.cmp(&half_way) {
            Ordering::Greater => true,
            Ordering::Equal => !(&coefficient % 2u8).is_zero(),
            Ordering::Less => false,
        };
        if round_up {
            coefficient += 1u8;
            if digit_count(&coefficient) > u64::from(PRECISION) {
                coefficient /= 10u8;
                exponent += 1;
            }
        }

        if negative {
            coefficient = -coefficient;
        }
        Self {
            coefficient,
            exponent,
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        if self.coefficient.is_zero() {
            self.exponent = 0;
            return self;
        }
        while (&self.coefficient % 10u8).is_zero() {
            self.coefficient /= 10u8;
            self.exponent += 1;
        }
        self
    }

    /// Both coefficients scaled to the smaller exponent
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, i64) {
        let exponent = self.exponent.min(other.exponent);
        let lhs = &self.coefficient * pow10((self.exponent - exponent) as u64);
        let rhs = &other.coefficient * pow10((other.exponent - exponent) as u64);
        (lhs, rhs, exponent)
    }

    fn sum(&self, other: &Self) -> Self {
        let (lhs, rhs, exponent) = self.aligned(other);
        Self::from_ratio(lhs + rhs, &BigInt::one(), exponent)
    }

    fn difference(&self, other: &Self) -> Self {
        let (lhs, rhs, exponent) = self.aligned(other);
        Self::from_ratio(lhs - rhs, &BigInt::one(), exponent)
    }

    fn product(&self, other: &Self) -> Self {
        Self::from_ratio(
            &self.coefficient * &other.coefficient,
            &BigInt::one(),
            self.exponent + other.exponent,
        )
    }

    fn quotient(&self, divisor: NonZeroU32) -> Self {
        Self::from_ratio(
            self.coefficient.clone(),
            &BigInt::from(divisor.get()),
            self.exponent,
        )
    }

    /// Quantize to whole cents, ties away from zero.
    pub fn round_cents(&self) -> Result<Decimal> {
        let magnitude = self.coefficient.abs();
        let mut cents = if self.exponent >= -2 {
            magnitude * pow10((self.exponent + 2) as u64)
        } else {
            let unit = pow10((-2 - self.exponent) as u64);
            let whole = &magnitude / &unit;
            let rest = &magnitude % &unit;
            if rest * 2u8 >= unit {
                whole + 1u8
            } else {
                whole
            }
        };
        if self.coefficient.is_negative() {
            cents = -cents;
        }

        cents
            .to_i128()
            .and_then(|cents| Decimal::try_from_i128_with_scale(cents, 2).ok())
            .ok_or_else(|| ReimburseError::Overflow(format!("{self} has no cent representation")))
    }
}

impl From<Decimal> for ContextDecimal {
    fn from(value: Decimal) -> Self {
        Self {
            coefficient: BigInt::from(value.mantissa()),
            exponent: -i64::from(value.scale()),
        }
        .normalized()
    }
}

impl From<u32> for ContextDecimal {
    fn from(value: u32) -> Self {
        Self {
            coefficient: BigInt::from(value),
            exponent: 0,
        }
        .normalized()
    }
}

impl Ord for ContextDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for ContextDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ContextDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ContextDecimal {}

impl PartialEq<Decimal> for ContextDecimal {
    fn eq(&self, other: &Decimal) -> bool {
        *self == ContextDecimal::from(*other)
    }
}

impl PartialOrd<Decimal> for ContextDecimal {
    fn partial_cmp(&self, other: &Decimal) -> Option<Ordering> {
        Some(self.cmp(&ContextDecimal::from(*other)))
    }
}

impl fmt::Display for ContextDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.coefficient.is_negative() { "-" } else { "" };
        let digits = self.coefficient.magnitude().to_string();

        if self.exponent >= 0 {
            return write!(f, "{sign}{digits}{}", "0".repeat(self.exponent as usize));
        }
        let scale = (-self.exponent) as usize;
        if digits.len() > scale {
            let (whole, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{whole}.{fraction}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

impl Neg for ContextDecimal {
    type Output = ContextDecimal;

    fn neg(self) -> ContextDecimal {
        ContextDecimal::from_ratio(-self.coefficient, &BigInt::one(), self.exponent)
    }
}

impl Neg for &ContextDecimal {
    type Output = ContextDecimal;

    fn neg(self) -> ContextDecimal {
        -self.clone()
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $inner:ident) => {
        impl $imp<&ContextDecimal> for &ContextDecimal {
            type Output = ContextDecimal;
            fn $method(self, rhs: &ContextDecimal) -> ContextDecimal {
                ContextDecimal::$inner(self, rhs)
            }
        }

        impl $imp<ContextDecimal> for ContextDecimal {
            type Output = ContextDecimal;
            fn $method(self, rhs: ContextDecimal) -> ContextDecimal {
                ContextDecimal::$inner(&self, &rhs)
            }
        }

        impl $imp<&ContextDecimal> for ContextDecimal {
            type Output = ContextDecimal;
            fn $method(self, rhs: &ContextDecimal) -> ContextDecimal {
                ContextDecimal::$inner(&self, rhs)
            }
        }

        impl $imp<ContextDecimal> for &ContextDecimal {
            type Output = ContextDecimal;
            fn $method(self, rhs: ContextDecimal) -> ContextDecimal {
                ContextDecimal::$inner(self, &rhs)
            }
        }

        impl $imp<Decimal> for ContextDecimal {
            type Output = ContextDecimal;
            fn $method(self, rhs: Decimal) -> ContextDecimal {
                ContextDecimal::$inner(&self, &ContextDecimal::from(rhs))
            }
        }

        impl $imp<Decimal> for &ContextDecimal {
            type Output = ContextDecimal;
            fn $method(self, rhs: Decimal) -> ContextDecimal {
                ContextDecimal::$inner(self, &ContextDecimal::from(rhs))
            }
        }
    };
}

forward_binop!(Add, add, sum);
forward_binop!(Sub, sub, difference);
forward_binop!(Mul, mul, product);

impl Div<NonZeroU32> for ContextDecimal {
    type Output = ContextDecimal;

    fn div(self, divisor: NonZeroU32) -> ContextDecimal {
        self.quotient(divisor)
    }
}

impl Div<NonZeroU32> for &ContextDecimal {
    type Output = ContextDecimal;

    fn div(self, divisor: NonZeroU32) -> ContextDecimal {
        self.quotient(divisor)
    }
}
