//! On-disk schema of the residual model artifact.
//!
//! ```json
//! {
//!   "features": ["trip_duration_days", "miles_traveled", "..."],
//!   "trees": [[{"feat": 0, "threshold": 3.5, "left": 1, "right": 2, "value": 0.0}, "..."]],
//!   "learning_rate": 0.05,
//!   "n_estimators": 300,
//!   "max_depth": 4,
//!   "init_prediction": -1.87,
//!   "shrink": 0.9,
//!   "cap": 600
//! }
//! ```
//!
//! With `"is_ensemble": true` the per-model fields move into `model1` and
//! `model2` sub-documents; `features`, `shrink` and `cap` stay at the top.
//! Unknown keys are ignored.

use crate::gbdt::{GbdtModel, Model, Tree};
use serde::Deserialize;

/// Shrink applied when the artifact does not carry one
pub const DEFAULT_SHRINK: f64 = 0.90;

/// Cap applied when the artifact does not carry one
pub const DEFAULT_CAP: f64 = 600.0;

/// Top-level artifact document
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactDocument {
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub is_ensemble: bool,
    #[serde(default)]
    pub shrink: Option<f64>,
    #[serde(default)]
    pub cap: Option<f64>,

    #[serde(default)]
    pub trees: Option<Vec<Tree>>,
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub init_prediction: Option<f64>,
    #[serde(default)]
    pub n_estimators: Option<u64>,
    #[serde(default)]
    pub max_depth: Option<u64>,

    #[serde(default)]
    pub model1: Option<ModelDocument>,
    #[serde(default)]
    pub model2: Option<ModelDocument>,
}

/// Per-model section of an ensemble artifact
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDocument {
    pub trees: Vec<Tree>,
    pub learning_rate: f64,
    pub init_prediction: f64,
    #[serde(default)]
    pub n_estimators: Option<u64>,
    #[serde(default)]
    pub max_depth: Option<u64>,
}

impl ModelDocument {
    fn into_model(self, label: &str) -> Model {
        check_estimator_count(label, self.n_estimators, self.trees.len());
        Model::new(self.trees, self.learning_rate, self.init_prediction)
    }
}

impl ArtifactDocument {
    pub fn shrink(&self) -> f64 {
        self.shrink.unwrap_or(DEFAULT_SHRINK)
    }

    pub fn cap(&self) -> f64 {
        self.cap.unwrap_or(DEFAULT_CAP)
    }

    /// Resolve the tagged model variant, reporting the first missing field.
    pub fn gbdt_model(&mut self) -> Result<GbdtModel, String> {
        if self.is_ensemble {
            let model1 = self
                .model1
                .take()
                .ok_or("ensemble artifact is missing `model1`")?;
            let model2 = self
                .model2
                .take()
                .ok_or("ensemble artifact is missing `model2`")?;
            return Ok(GbdtModel::Ensemble {
                model1: model1.into_model("model1"),
                model2: model2.into_model("model2"),
            });
        }

        let trees = self.trees.take().ok_or("artifact is missing `trees`")?;
        let learning_rate = self
            .learning_rate
            .ok_or("artifact is missing `learning_rate`")?;
        let init_prediction = self
            .init_prediction
            .ok_or("artifact is missing `init_prediction`")?;
        check_estimator_count("model", self.n_estimators, trees.len());
        Ok(GbdtModel::Single(Model::new(
            trees,
            learning_rate,
            init_prediction,
        )))
    }
}

fn check_estimator_count(label: &str, declared: Option<u64>, actual: usize) {
    if let Some(declared) = declared {
        if declared != actual as u64 {
            tracing::warn!(
                "{label} declares n_estimators={declared} but carries {actual} trees"
            );
        }
    }
}
