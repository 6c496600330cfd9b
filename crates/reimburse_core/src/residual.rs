//! Residual predictor: derived features → tree ensemble → shrink → cap.

use crate::artifact::ArtifactDocument;
use crate::context::ContextDecimal;
use crate::errors::{ReimburseError, Result};
use crate::features::{DerivedFeatures, FeatureLayout};
use crate::gbdt::GbdtModel;
use crate::types::{TripInput, MAX_AMOUNT};

/// A loaded, validated residual model with its post-processing parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualModel {
    layout: FeatureLayout,
    gbdt: GbdtModel,
    shrink: ContextDecimal,
    cap: ContextDecimal,
}

impl ResidualModel {
    /// Assemble and validate a residual model.
    ///
    /// Every tree must only split on slots of `layout`, and `cap` must lie in
    /// `0..=MAX_AMOUNT`.
    pub fn new(
        layout: FeatureLayout,
        gbdt: GbdtModel,
        shrink: impl Into<ContextDecimal>,
        cap: impl Into<ContextDecimal>,
    ) -> Result<Self> {
        let shrink = shrink.into();
        let cap = cap.into();
        if cap < ContextDecimal::zero() {
            return Err(ReimburseError::InvalidModel(format!(
                "cap must be non-negative, got {cap}"
            )));
        }
        if cap > MAX_AMOUNT {
            return Err(ReimburseError::InvalidModel(format!(
                "cap must not exceed {MAX_AMOUNT}, got {cap}"
            )));
        }
        gbdt.validate(layout.len())
            .map_err(ReimburseError::InvalidModel)?;
        Ok(Self {
            layout,
            gbdt,
            shrink,
            cap,
        })
    }

    /// Build from a parsed artifact document
    pub fn from_document(mut document: ArtifactDocument) -> Result<Self> {
        let layout = match document.features.as_deref() {
            Some(names) => FeatureLayout::resolve(names),
            None => FeatureLayout::default_order(),
        };
        let gbdt = document
            .gbdt_model()
            .map_err(ReimburseError::InvalidModel)?;
        let shrink = ContextDecimal::from_real(document.shrink())?;
        let cap = ContextDecimal::from_real(document.cap())?;
        Self::new(layout, gbdt, shrink, cap)
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn gbdt(&self) -> &GbdtModel {
        &self.gbdt
    }

    pub fn shrink(&self) -> &ContextDecimal {
        &self.shrink
    }

    pub fn cap(&self) -> &ContextDecimal {
        &self.cap
    }

    /// Raw ensemble output for a trip, before shrink and cap
    pub fn raw_prediction(&self, input: &TripInput) -> f64 {
        let features = DerivedFeatures::from_trip(input);
        self.gbdt.raw_prediction(&self.layout.vector(&features))
    }

    /// Apply shrink then clamp to `[-cap, cap]`, in decimal arithmetic.
    ///
    /// Any finite raw value is accepted; magnitudes past the cap saturate.
    pub fn post_process(&self, raw: f64) -> Result<ContextDecimal> {
        let shrunk = ContextDecimal::from_real(raw)? * &self.shrink;
        Ok(shrunk.clamp(-&self.cap, self.cap.clone()))
    }

    /// Shrunk and capped residual for a trip, unrounded
    pub fn residual(&self, input: &TripInput) -> Result<ContextDecimal> {
        self.post_process(self.raw_prediction(input))
    }
}
