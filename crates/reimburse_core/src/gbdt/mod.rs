//! Gradient Boosted Decision Tree inference for the residual correction
//!
//! This module evaluates tree ensembles exported by the offline training
//! pipeline:
//!
//! - Trees are index-addressed node lists; node 0 is the root
//! - Traversal goes left when `feature <= threshold`
//! - A node with both children `-1` is a leaf; its value is scaled by the
//!   learning rate and added to the running total
//! - A model's raw prediction is `init_prediction` plus every tree's contribution
//! - An ensemble averages the raw predictions of its two models
//!
//! # Usage
//!
//! ```rust
//! use reimburse_core::gbdt::{GbdtModel, Model, Node, Tree};
//!
//! let tree = Tree::new(vec![
//!     Node::internal(0, 50.0, 1, 2),
//!     Node::leaf(100.0),
//!     Node::leaf(200.0),
//! ]);
//! let model = GbdtModel::Single(Model::new(vec![tree], 0.1, 0.0));
//!
//! assert_eq!(model.raw_prediction(&[30.0]), 10.0);
//! ```

pub mod model;
pub mod tree;

pub use model::{GbdtModel, Model};
pub use tree::{Node, Tree, NO_CHILD};
