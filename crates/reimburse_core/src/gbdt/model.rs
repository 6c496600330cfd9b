//! Boosted tree models
//!
//! A [`Model`] is one gradient-boosted ensemble: a bias (`init_prediction`)
//! plus the learning-rate-scaled leaf of every tree. A [`GbdtModel`] is either
//! one such model or a pair whose raw predictions are averaged.

use super::tree::Tree;

/// One boosted ensemble of regression trees
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Trees in boosting order
    pub trees: Vec<Tree>,

    /// Scale applied to every leaf value
    pub learning_rate: f64,

    /// Bias added once before any tree
    pub init_prediction: f64,
}

impl Model {
    pub fn new(trees: Vec<Tree>, learning_rate: f64, init_prediction: f64) -> Self {
        Self {
            trees,
            learning_rate,
            init_prediction,
        }
    }

    /// Raw prediction: `init_prediction + Σ leaf × learning_rate`.
    ///
    /// Contributions are accumulated in tree order; the summation order is part
    /// of the result.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut total = self.init_prediction;
        for tree in &self.trees {
            total += tree.leaf_value(features) * self.learning_rate;
        }
        total
    }

    /// Validate model structure
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if !self.learning_rate.is_finite() {
            return Err(format!("invalid learning_rate: {}", self.learning_rate));
        }
        if !self.init_prediction.is_finite() {
            return Err(format!("invalid init_prediction: {}", self.init_prediction));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(feature_count)
                .map_err(|e| format!("tree {i} validation failed: {e}"))?;
        }
        Ok(())
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Single model or averaged pair, resolved once at load time
#[derive(Debug, Clone, PartialEq)]
pub enum GbdtModel {
    Single(Model),
    Ensemble { model1: Model, model2: Model },
}

impl GbdtModel {
    /// Raw prediction before shrink and cap
    pub fn raw_prediction(&self, features: &[f64]) -> f64 {
        match self {
            GbdtModel::Single(model) => model.predict(features),
            GbdtModel::Ensemble { model1, model2 } => {
                (model1.predict(features) + model2.predict(features)) / 2.0
            }
        }
    }

    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        match self {
            GbdtModel::Single(model) => model.validate(feature_count),
            GbdtModel::Ensemble { model1, model2 } => {
                model1
                    .validate(feature_count)
                    .map_err(|e| format!("model1: {e}"))?;
                model2
                    .validate(feature_count)
                    .map_err(|e| format!("model2: {e}"))
            }
        }
    }

    pub fn num_trees(&self) -> usize {
        match self {
            GbdtModel::Single(model) => model.num_trees(),
            GbdtModel::Ensemble { model1, model2 } => model1.num_trees() + model2.num_trees(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GbdtModel::Single(_) => "single",
            GbdtModel::Ensemble { .. } => "ensemble",
        }
    }
}
