//! Trip inputs and the per-component result of a computation.

use crate::errors::{ReimburseError, Result};
use crate::money::fixed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Largest miles or receipt amount accepted for one trip
pub const MAX_AMOUNT: Decimal = fixed(1_000_000_000, 0);

/// One trip to be reimbursed.
///
/// Constructed through [`TripInput::new`] (or deserialized through it), which
/// enforces `days >= 1` and amounts in `0..=MAX_AMOUNT`. Fields are read-only
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TripFields")]
pub struct TripInput {
    days: NonZeroU32,
    miles: Decimal,
    receipts: Decimal,
}

#[derive(Deserialize)]
struct TripFields {
    days: u32,
    miles: Decimal,
    receipts: Decimal,
}

impl TryFrom<TripFields> for TripInput {
    type Error = ReimburseError;

    fn try_from(fields: TripFields) -> Result<Self> {
        TripInput::new(fields.days, fields.miles, fields.receipts)
    }
}

fn check_amount(name: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ReimburseError::InvalidInput(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(ReimburseError::InvalidInput(format!(
            "{name} must not exceed {MAX_AMOUNT}, got {value}"
        )));
    }
    Ok(())
}

impl TripInput {
    /// Validate and build a trip input
    pub fn new(days: u32, miles: Decimal, receipts: Decimal) -> Result<Self> {
        let days = NonZeroU32::new(days).ok_or_else(|| {
            ReimburseError::InvalidInput("trip duration must be at least 1 day".to_string())
        })?;
        check_amount("miles traveled", miles)?;
        check_amount("receipt total", receipts)?;
        Ok(Self {
            days,
            miles,
            receipts,
        })
    }

    pub fn days(&self) -> u32 {
        self.days.get()
    }

    /// Day count as a divisor
    pub fn day_count(&self) -> NonZeroU32 {
        self.days
    }

    pub fn miles(&self) -> Decimal {
        self.miles
    }

    pub fn receipts(&self) -> Decimal {
        self.receipts
    }
}

/// The six cent-rounded contributions that make up a reimbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReimbursementComponents {
    pub per_diem: Decimal,
    pub mileage: Decimal,
    pub receipt: Decimal,
    pub efficiency: Decimal,
    pub special: Decimal,
    pub ml_residual: Decimal,
}

impl ReimbursementComponents {
    /// Exact sum of the already-rounded components.
    ///
    /// No rounding happens here: every addend is cent-quantized, so the sum is too.
    /// Inputs bounded by [`MAX_AMOUNT`] and a bounded residual cap keep every
    /// addend far inside the `Decimal` range.
    pub fn total(&self) -> Decimal {
        self.per_diem + self.mileage + self.receipt + self.efficiency + self.special + self.ml_residual
    }
}
