//! Mileage layer.
//!
//! Base amount is two-tier: the first 100 miles at the high rate and the rest
//! at the low rate. Two independent bonuses stack on top:
//! - high-mileage bonus on miles beyond 500, scaled by `1 + 1/days`
//! - long-trip booster on miles beyond 700 for trips of 7+ days that average
//!   more than 120 miles per day

use crate::context::ContextDecimal;
use crate::money::fixed;
use crate::types::TripInput;
use rust_decimal::Decimal;

const TIER_BREAKPOINT: Decimal = fixed(100, 0);
const FIRST_TIER_RATE: Decimal = fixed(58, 2);
const SECOND_TIER_RATE: Decimal = fixed(15, 2);

const HIGH_MILEAGE_THRESHOLD: Decimal = fixed(500, 0);
const HIGH_MILEAGE_BASE_RATE: Decimal = fixed(30, 2);

const LONG_TRIP_MIN_DAYS: u32 = 7;
const LONG_TRIP_THRESHOLD: Decimal = fixed(700, 0);
const LONG_TRIP_MIN_MILES_PER_DAY: Decimal = fixed(120, 0);
const LONG_TRIP_RATE: Decimal = fixed(25, 2);

/// Tiered mileage plus any triggered bonuses, unrounded.
pub fn mileage_amount(input: &TripInput) -> ContextDecimal {
    let miles = ContextDecimal::from(input.miles());
    let days = input.day_count();

    let mut amount = if miles <= TIER_BREAKPOINT {
        &miles * FIRST_TIER_RATE
    } else {
        ContextDecimal::from(TIER_BREAKPOINT) * FIRST_TIER_RATE
            + (&miles - TIER_BREAKPOINT) * SECOND_TIER_RATE
    };

    if miles > HIGH_MILEAGE_THRESHOLD {
        let day_scale = ContextDecimal::one() + ContextDecimal::one() / days;
        let scaled_rate = ContextDecimal::from(HIGH_MILEAGE_BASE_RATE) * day_scale;
        amount = amount + (&miles - HIGH_MILEAGE_THRESHOLD) * scaled_rate;
    }

    if input.days() >= LONG_TRIP_MIN_DAYS
        && miles > LONG_TRIP_THRESHOLD
        && &miles / days > LONG_TRIP_MIN_MILES_PER_DAY
    {
        amount = amount + (&miles - LONG_TRIP_THRESHOLD) * LONG_TRIP_RATE;
    }

    amount
}
