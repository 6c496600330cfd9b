//! Deterministic rule layers.
//!
//! Each layer is a pure function of the trip and returns an unrounded decimal
//! amount. Layers share no state; the efficiency layer recomputes the mileage
//! layer rather than reusing its rounded output.
//!
//! Layers:
//! - `per_diem`: daily allowance keyed by trip length
//! - `mileage`: two-tier mileage with high-mileage and long-trip bonuses
//! - `receipts`: single-day tiers or capped-linear multi-day policy, plus the cents quirk
//! - `efficiency`: miles-per-day bonus or penalty
//! - `special`: flat cumulative adjustments

pub mod efficiency;
pub mod mileage;
pub mod per_diem;
pub mod receipts;
pub mod special;

pub use efficiency::efficiency_adjustment;
pub use mileage::mileage_amount;
pub use per_diem::{daily_rate, per_diem_amount};
pub use receipts::{daily_receipt_cap, receipt_amount, receipt_excess_rate};
pub use special::special_adjustment;
