//! Receipts layer.
//!
//! Single-day trips are reimbursed on progressive tiers. Longer trips get 60%
//! up to a total cap of `daily_cap × days` and a bucket-dependent rate on the
//! excess. Independently, receipt totals ending in 49 or 99 cents earn a flat
//! bonus carried over from the legacy system.

use crate::context::ContextDecimal;
use crate::money::{cents_digits, fixed};
use crate::types::TripInput;
use rust_decimal::Decimal;

/// Single-day tiers: `(band width, rate)`. `None` is the open-ended remainder.
const SINGLE_DAY_TIERS: &[(Option<Decimal>, Decimal)] = &[
    (Some(fixed(500, 0)), fixed(60, 2)),
    (Some(fixed(1000, 0)), fixed(40, 2)),
    (None, fixed(20, 2)),
];

/// Per-day receipt caps; any trip of 7 days or more shares the last entry.
const DAILY_RECEIPT_CAPS: &[(u32, Decimal)] = &[
    (1, fixed(200, 0)),
    (2, fixed(150, 0)),
    (3, fixed(150, 0)),
    (4, fixed(120, 0)),
    (5, fixed(120, 0)),
    (6, fixed(120, 0)),
    (7, fixed(100, 0)),
];
const LONG_TRIP_DAILY_CAP: Decimal = fixed(100, 0);

const BASE_RATE: Decimal = fixed(60, 2);

/// Excess rate buckets: `(first day, last day, rate)`.
const EXCESS_RATES: &[(u32, u32, Decimal)] = &[
    (1, 1, fixed(0, 2)),
    (2, 3, fixed(40, 2)),
    (4, 6, fixed(10, 2)),
    (7, 30, fixed(20, 2)),
];
const DEFAULT_EXCESS_RATE: Decimal = fixed(20, 2);

const QUIRK_CENTS: [i64; 2] = [49, 99];
const QUIRK_BONUS: Decimal = fixed(5, 0);

/// Per-day receipt cap for a trip of `days` days.
pub fn daily_receipt_cap(days: u32) -> Decimal {
    DAILY_RECEIPT_CAPS
        .iter()
        .find(|(d, _)| *d == days)
        .map(|(_, cap)| *cap)
        .unwrap_or(LONG_TRIP_DAILY_CAP)
}

/// Rate applied to receipts above the total cap.
pub fn receipt_excess_rate(days: u32) -> Decimal {
    EXCESS_RATES
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&days))
        .map(|(_, _, rate)| *rate)
        .unwrap_or(DEFAULT_EXCESS_RATE)
}

fn single_day_tiers(receipts: Decimal) -> ContextDecimal {
    let mut remaining = ContextDecimal::from(receipts);
    let mut amount = ContextDecimal::zero();

    for (width, rate) in SINGLE_DAY_TIERS {
        if remaining <= Decimal::ZERO {
            break;
        }
        let portion = match width {
            Some(width) => remaining.clone().min(ContextDecimal::from(*width)),
            None => remaining.clone(),
        };
        amount = amount + &portion * *rate;
        remaining = remaining - portion;
    }

    amount
}

fn capped_linear(days: u32, receipts: Decimal) -> ContextDecimal {
    let receipts = ContextDecimal::from(receipts);
    let total_cap = ContextDecimal::from(daily_receipt_cap(days)) * ContextDecimal::from(days);

    if receipts <= total_cap {
        receipts * BASE_RATE
    } else {
        &total_cap * BASE_RATE + (receipts - &total_cap) * receipt_excess_rate(days)
    }
}

/// Receipt reimbursement, unrounded.
pub fn receipt_amount(input: &TripInput) -> ContextDecimal {
    let receipts = input.receipts();

    let mut amount = if input.days() == 1 {
        single_day_tiers(receipts)
    } else {
        capped_linear(input.days(), receipts)
    };

    if QUIRK_CENTS.contains(&cents_digits(receipts)) {
        amount = amount + QUIRK_BONUS;
    }

    amount
}
