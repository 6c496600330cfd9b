//! Efficiency layer: a bonus for trips in the miles-per-day sweet spot and a
//! penalty for very low daily mileage, both proportional to the mileage layer.

use super::mileage::mileage_amount;
use crate::context::ContextDecimal;
use crate::money::fixed;
use crate::types::TripInput;
use rust_decimal::Decimal;

const SWEET_SPOT_MIN: Decimal = fixed(180, 0);
const SWEET_SPOT_MAX: Decimal = fixed(220, 0);
const SWEET_SPOT_BONUS_RATE: Decimal = fixed(15, 2);

const LOW_EFFICIENCY_LIMIT: Decimal = fixed(50, 0);
const LOW_EFFICIENCY_PENALTY_RATE: Decimal = fixed(5, 2);

/// Bonus (positive) or penalty (negative) based on miles per day, unrounded.
///
/// `TripInput` guarantees `days >= 1`, so the division is always defined.
pub fn efficiency_adjustment(input: &TripInput) -> ContextDecimal {
    let miles_per_day = ContextDecimal::from(input.miles()) / input.day_count();

    if miles_per_day >= SWEET_SPOT_MIN && miles_per_day <= SWEET_SPOT_MAX {
        mileage_amount(input) * SWEET_SPOT_BONUS_RATE
    } else if miles_per_day < LOW_EFFICIENCY_LIMIT {
        -(mileage_amount(input) * LOW_EFFICIENCY_PENALTY_RATE)
    } else {
        ContextDecimal::zero()
    }
}
