//! Legacy travel-reimbursement engine.
//!
//! Reproduces a legacy reimbursement formula as five deterministic decimal
//! rule layers plus a gradient-boosted residual correction read from a JSON
//! artifact. Every component is rounded to the cent on its own and the
//! rounded components are summed.
//!
//! Modules:
//! - `rules`: per-diem, mileage, receipts, efficiency and special-case layers
//! - `features`: derived trip features and their resolution against a model
//! - `gbdt`: regression trees, boosted models and the two-model ensemble
//! - `artifact`: on-disk model document
//! - `residual`: feature vector → ensemble → shrink → cap
//! - `loader`: artifact loading and the injectable model provider
//! - `config`: model path and log level from file and environment
//! - `context`: 28-significant-digit decimal arithmetic with cent rounding
//! - `money`: fixed constants and decimal/real conversions
//! - `types`: trip input and component breakdown
//! - `errors`: error type

pub mod artifact;
pub mod config;
pub mod context;
pub mod errors;
pub mod features;
pub mod gbdt;
pub mod loader;
pub mod money;
pub mod residual;
pub mod rules;
pub mod types;

pub use config::ReimburseConfig;
pub use context::ContextDecimal;
pub use errors::{ReimburseError, Result};
pub use loader::{load_artifact, CachedModelLoader, LoadOutcome, ModelProvider, NoModel};
pub use residual::ResidualModel;
pub use types::{ReimbursementComponents, TripInput, MAX_AMOUNT};

use rust_decimal::Decimal;
use tracing::debug;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compute every cent-rounded component of a reimbursement.
///
/// The residual is `0.00` when `provider` has no model. Errors come only from
/// loading the model, from a non-finite residual prediction, or from a
/// component with no cent representation.
pub fn calculate_components<P>(input: &TripInput, provider: &P) -> Result<ReimbursementComponents>
where
    P: ModelProvider + ?Sized,
{
    let ml_residual = match provider.residual_model()? {
        Some(model) => model.residual(input)?.round_cents()?,
        None => Decimal::ZERO,
    };

    let components = ReimbursementComponents {
        per_diem: rules::per_diem_amount(input).round_cents()?,
        mileage: rules::mileage_amount(input).round_cents()?,
        receipt: rules::receipt_amount(input).round_cents()?,
        efficiency: rules::efficiency_adjustment(input).round_cents()?,
        special: rules::special_adjustment(input).round_cents()?,
        ml_residual,
    };

    debug!(
        days = input.days(),
        miles = %input.miles(),
        receipts = %input.receipts(),
        per_diem = %components.per_diem,
        mileage = %components.mileage,
        receipt = %components.receipt,
        efficiency = %components.efficiency,
        special = %components.special,
        ml_residual = %components.ml_residual,
        "Reimbursement components"
    );

    Ok(components)
}

/// Total reimbursement for a trip: the sum of the rounded components.
pub fn calculate_reimbursement<P>(input: &TripInput, provider: &P) -> Result<Decimal>
where
    P: ModelProvider + ?Sized,
{
    calculate_components(input, provider).map(|c| c.total())
}
