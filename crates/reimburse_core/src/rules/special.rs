//! Special-case layer: flat adjustments that trigger independently and add up.

use crate::context::ContextDecimal;
use crate::money::fixed;
use crate::types::TripInput;
use rust_decimal::Decimal;

const FIVE_DAY_BONUS: Decimal = fixed(15, 0);

const HIGH_VALUE_THRESHOLD: Decimal = fixed(1500, 0);
const HIGH_VALUE_BONUS: Decimal = fixed(25, 0);

const SINGLE_DAY_MILES_THRESHOLD: Decimal = fixed(500, 0);
const SINGLE_DAY_RECEIPTS_THRESHOLD: Decimal = fixed(1000, 0);
const SINGLE_DAY_ACTIVITY_BONUS: Decimal = fixed(50, 0);

pub fn special_adjustment(input: &TripInput) -> ContextDecimal {
    let mut adjustment = ContextDecimal::zero();

    if input.days() == 5 {
        adjustment = adjustment + FIVE_DAY_BONUS;
    }

    if ContextDecimal::from(input.receipts()) + input.miles() > HIGH_VALUE_THRESHOLD {
        adjustment = adjustment + HIGH_VALUE_BONUS;
    }

    if input.days() == 1
        && (input.miles() > SINGLE_DAY_MILES_THRESHOLD
            || input.receipts() > SINGLE_DAY_RECEIPTS_THRESHOLD)
    {
        adjustment = adjustment + SINGLE_DAY_ACTIVITY_BONUS;
    }

    adjustment
}
