//! Derived features for the residual model.
//!
//! The residual model declares the order of its input vector by name. Names are
//! resolved once, at load time, against the fixed set of features this crate
//! knows how to derive; names that do not resolve occupy a slot that always
//! reads `0.0`.

use crate::money::to_real;
use crate::types::TripInput;

/// Order assumed when an artifact does not declare its feature list.
pub const DEFAULT_FEATURE_ORDER: [&str; 5] = [
    "trip_duration_days",
    "miles_traveled",
    "total_receipts_amount",
    "miles_per_day",
    "receipts_per_day",
];

const FEATURE_COUNT: usize = 9;

const ONE_DAY_BIG_RECEIPTS: f64 = 1000.0;
const LONG_TRIP_MIN_DAYS: u32 = 7;
const LONG_TRIP_HIGH_EFFICIENCY: f64 = 150.0;

/// Every feature that can be derived from a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedFeature {
    TripDurationDays,
    MilesTraveled,
    TotalReceiptsAmount,
    MilesPerDay,
    ReceiptsPerDay,
    LogReceipts,
    LogMiles,
    /// Single-day trip with receipts over $1000 (0/1)
    IsOneDayBig,
    /// 7+ day trip averaging over 150 miles per day (0/1)
    IsLongHighEfficiency,
}

impl DerivedFeature {
    pub const ALL: [DerivedFeature; FEATURE_COUNT] = [
        DerivedFeature::TripDurationDays,
        DerivedFeature::MilesTraveled,
        DerivedFeature::TotalReceiptsAmount,
        DerivedFeature::MilesPerDay,
        DerivedFeature::ReceiptsPerDay,
        DerivedFeature::LogReceipts,
        DerivedFeature::LogMiles,
        DerivedFeature::IsOneDayBig,
        DerivedFeature::IsLongHighEfficiency,
    ];

    /// Name used in model artifacts
    pub fn name(self) -> &'static str {
        match self {
            DerivedFeature::TripDurationDays => "trip_duration_days",
            DerivedFeature::MilesTraveled => "miles_traveled",
            DerivedFeature::TotalReceiptsAmount => "total_receipts_amount",
            DerivedFeature::MilesPerDay => "miles_per_day",
            DerivedFeature::ReceiptsPerDay => "receipts_per_day",
            DerivedFeature::LogReceipts => "log_receipts",
            DerivedFeature::LogMiles => "log_miles",
            DerivedFeature::IsOneDayBig => "is_one_day_big",
            DerivedFeature::IsLongHighEfficiency => "is_long_hi_eff",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// All derived feature values for one trip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    values: [f64; FEATURE_COUNT],
}

impl DerivedFeatures {
    pub fn from_trip(input: &TripInput) -> Self {
        let days = f64::from(input.days());
        let miles = to_real(input.miles());
        let receipts = to_real(input.receipts());
        let miles_per_day = miles / days;
        let receipts_per_day = receipts / days;

        let flag = |condition: bool| if condition { 1.0 } else { 0.0 };

        let mut values = [0.0; FEATURE_COUNT];
        values[DerivedFeature::TripDurationDays.slot()] = days;
        values[DerivedFeature::MilesTraveled.slot()] = miles;
        values[DerivedFeature::TotalReceiptsAmount.slot()] = receipts;
        values[DerivedFeature::MilesPerDay.slot()] = miles_per_day;
        values[DerivedFeature::ReceiptsPerDay.slot()] = receipts_per_day;
        values[DerivedFeature::LogReceipts.slot()] = receipts.ln_1p();
        values[DerivedFeature::LogMiles.slot()] = miles.ln_1p();
        values[DerivedFeature::IsOneDayBig.slot()] =
            flag(input.days() == 1 && receipts > ONE_DAY_BIG_RECEIPTS);
        values[DerivedFeature::IsLongHighEfficiency.slot()] =
            flag(input.days() >= LONG_TRIP_MIN_DAYS && miles_per_day > LONG_TRIP_HIGH_EFFICIENCY);

        Self { values }
    }

    pub fn get(&self, feature: DerivedFeature) -> f64 {
        self.values[feature.slot()]
    }
}

/// A model's declared feature order, resolved against [`DerivedFeature`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    names: Vec<String>,
    slots: Vec<Option<DerivedFeature>>,
}

impl FeatureLayout {
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let slots = names.iter().map(|n| DerivedFeature::from_name(n)).collect();
        Self { names, slots }
    }

    pub fn default_order() -> Self {
        Self::resolve(&DEFAULT_FEATURE_ORDER)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Declared names that read as constant zero
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| name.as_str())
    }

    /// Feature vector in declared order
    pub fn vector(&self, features: &DerivedFeatures) -> Vec<f64> {
        self.slots
            .iter()
            .map(|slot| slot.map_or(0.0, |feature| features.get(feature)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn trip(days: u32, miles: i64, receipts: Decimal) -> TripInput {
        TripInput::new(days, Decimal::from(miles), receipts).unwrap()
    }

    #[test]
    fn names_round_trip() {
        for feature in DerivedFeature::ALL {
            assert_eq!(DerivedFeature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(DerivedFeature::from_name("trip_cost_index"), None);
    }

    #[test]
    fn derives_ratios_and_logs() {
        let features = DerivedFeatures::from_trip(&trip(4, 600, Decimal::new(20050, 2)));
        assert_eq!(features.get(DerivedFeature::TripDurationDays), 4.0);
        assert_eq!(features.get(DerivedFeature::MilesTraveled), 600.0);
        assert_eq!(features.get(DerivedFeature::TotalReceiptsAmount), 200.5);
        assert_eq!(features.get(DerivedFeature::MilesPerDay), 150.0);
        assert_eq!(features.get(DerivedFeature::ReceiptsPerDay), 200.5 / 4.0);
        assert_eq!(features.get(DerivedFeature::LogMiles), 600f64.ln_1p());
        assert_eq!(features.get(DerivedFeature::LogReceipts), 200.5f64.ln_1p());
    }

    #[test]
    fn flags_are_zero_or_one() {
        let big_day = DerivedFeatures::from_trip(&trip(1, 10, Decimal::new(100001, 2)));
        assert_eq!(big_day.get(DerivedFeature::IsOneDayBig), 1.0);
        let exactly_limit = DerivedFeatures::from_trip(&trip(1, 10, Decimal::from(1000)));
        assert_eq!(exactly_limit.get(DerivedFeature::IsOneDayBig), 0.0);

        let long_fast = DerivedFeatures::from_trip(&trip(7, 1200, Decimal::ZERO));
        assert_eq!(long_fast.get(DerivedFeature::IsLongHighEfficiency), 1.0);
        let long_slow = DerivedFeatures::from_trip(&trip(7, 1050, Decimal::ZERO));
        assert_eq!(long_slow.get(DerivedFeature::IsLongHighEfficiency), 0.0);
    }

    #[test]
    fn layout_follows_declared_order_with_zero_for_unknown() {
        let layout = FeatureLayout::resolve(&["miles_per_day", "weather_index", "trip_duration_days"]);
        let features = DerivedFeatures::from_trip(&trip(2, 300, Decimal::ZERO));
        assert_eq!(layout.vector(&features), vec![150.0, 0.0, 2.0]);
        assert_eq!(layout.unresolved().collect::<Vec<_>>(), vec!["weather_index"]);
    }

    #[test]
    fn default_layout_has_five_raw_features() {
        let layout = FeatureLayout::default_order();
        assert_eq!(layout.len(), 5);
        assert_eq!(layout.unresolved().count(), 0);
    }
}
