//! A gradient-boosted ensemble in the exporter's JSON layout, checked against
//! predictions recorded by the exporter's own tree walker.

use reimburse_core::features::DerivedFeatures;
use reimburse_core::gbdt::GbdtModel;
use reimburse_core::loader::parse_artifact;
use reimburse_core::{calculate_components, ResidualModel, TripInput};
use rust_decimal::Decimal;
use serde::Deserialize;

const EXPORTED: &[u8] = include_bytes!("fixtures/exported_ensemble.json");
const RECORDED: &str = include_str!("fixtures/recorded_predictions.json");

/// Predictions must agree with the exporter within this tolerance
const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Deserialize)]
struct Recorded {
    trips: Vec<RecordedTrip>,
}

#[derive(Debug, Deserialize)]
struct RecordedTrip {
    days: u32,
    miles: Decimal,
    receipts: Decimal,
    model1: f64,
    model2: f64,
    raw_prediction: f64,
    ml_residual: Decimal,
    total: Decimal,
}

impl RecordedTrip {
    fn input(&self) -> TripInput {
        TripInput::new(self.days, self.miles, self.receipts).unwrap()
    }
}

fn recorded() -> Vec<RecordedTrip> {
    let recorded: Recorded = serde_json::from_str(RECORDED).unwrap();
    assert!(!recorded.trips.is_empty());
    recorded.trips
}

fn exported() -> ResidualModel {
    parse_artifact(EXPORTED).unwrap()
}

#[test]
fn exported_artifact_loads_as_ensemble() {
    let model = exported();
    assert_eq!(model.gbdt().kind(), "ensemble");
    assert_eq!(model.gbdt().num_trees(), 65);
    assert_eq!(model.layout().len(), 9);
    assert_eq!(model.layout().unresolved().count(), 0);
    assert_eq!(*model.shrink(), Decimal::new(85, 2));
    assert_eq!(*model.cap(), Decimal::from(250));
}

#[test]
fn each_model_matches_recorded_predictions() {
    let model = exported();
    let GbdtModel::Ensemble { model1, model2 } = model.gbdt() else {
        panic!("expected an ensemble");
    };

    for trip in recorded() {
        let features = model.layout().vector(&DerivedFeatures::from_trip(&trip.input()));
        let first = model1.predict(&features);
        let second = model2.predict(&features);
        assert!(
            (first - trip.model1).abs() < TOLERANCE,
            "model1 on {trip:?}: {first}"
        );
        assert!(
            (second - trip.model2).abs() < TOLERANCE,
            "model2 on {trip:?}: {second}"
        );
    }
}

#[test]
fn ensemble_average_matches_recorded_predictions() {
    let model = exported();
    for trip in recorded() {
        let raw = model.raw_prediction(&trip.input());
        assert!(
            (raw - trip.raw_prediction).abs() < TOLERANCE,
            "ensemble on {trip:?}: {raw}"
        );
    }
}

#[test]
fn residual_and_total_match_the_legacy_system() {
    let model = exported();
    for trip in recorded() {
        let components = calculate_components(&trip.input(), &model).unwrap();
        assert_eq!(components.ml_residual, trip.ml_residual, "{trip:?}");
        assert_eq!(components.total(), trip.total, "{trip:?}");
    }
}
