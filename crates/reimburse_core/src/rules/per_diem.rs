//! Per-diem layer.

use crate::context::ContextDecimal;
use crate::money::fixed;
use crate::types::TripInput;
use rust_decimal::Decimal;

/// Daily rate by exact trip length. The 8–9 day bucket is deliberately
/// lower than its neighbours.
const PER_DIEM_RATES: &[(u32, Decimal)] = &[
    (1, fixed(120, 0)),
    (2, fixed(100, 0)),
    (3, fixed(100, 0)),
    (4, fixed(110, 0)),
    (5, fixed(110, 0)),
    (6, fixed(110, 0)),
    (7, fixed(75, 0)),
    (8, fixed(60, 0)),
    (9, fixed(55, 0)),
    (10, fixed(55, 0)),
    (11, fixed(60, 0)),
    (12, fixed(60, 0)),
    (13, fixed(55, 0)),
    (14, fixed(50, 0)),
];

/// Rate for trips longer than the table.
const EXTENDED_TRIP_RATE: Decimal = fixed(45, 0);

/// Rate for any untabulated length up to 14 days.
const FALLBACK_RATE: Decimal = fixed(50, 0);

const LAST_TABULATED_DAY: u32 = 14;

/// Daily allowance for a trip of `days` days.
pub fn daily_rate(days: u32) -> Decimal {
    if let Some((_, rate)) = PER_DIEM_RATES.iter().find(|(d, _)| *d == days) {
        return *rate;
    }
    if days > LAST_TABULATED_DAY {
        EXTENDED_TRIP_RATE
    } else {
        FALLBACK_RATE
    }
}

/// `daily_rate × days`
pub fn per_diem_amount(input: &TripInput) -> ContextDecimal {
    ContextDecimal::from(daily_rate(input.days())) * ContextDecimal::from(input.days())
}
