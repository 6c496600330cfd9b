//! Decision tree structures for residual inference
//!
//! Trees are index-addressed node lists with the root at index 0, exactly as
//! exported by the training pipeline. Traversal compares with `<=` and stops at
//! the first node whose children are both [`NO_CHILD`].

use serde::{Deserialize, Serialize};

/// Child index marking a leaf
pub const NO_CHILD: i32 = -1;

/// A decision tree node (internal or leaf)
///
/// For internal nodes:
/// - `feature_index` indexes the model's declared feature vector
/// - `left` and `right` point to child node indices
///
/// For leaf nodes:
/// - `left == right == -1`
/// - `leaf_value` is the contribution before learning-rate scaling
/// - `feature_index` and `threshold` carry exporter placeholders and are ignored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Feature to split on
    #[serde(rename = "feat")]
    pub feature_index: i32,

    /// Split threshold; features `<=` go left
    pub threshold: f64,

    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Leaf value
    #[serde(rename = "value")]
    pub leaf_value: f64,
}

impl Node {
    /// Create a new internal (split) node
    pub fn internal(feature_index: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            feature_index,
            threshold,
            left,
            right,
            leaf_value: 0.0,
        }
    }

    /// Create a new leaf node
    pub fn leaf(value: f64) -> Self {
        Self {
            feature_index: -2,
            threshold: -2.0,
            left: NO_CHILD,
            right: NO_CHILD,
            leaf_value: value,
        }
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.left == NO_CHILD && self.right == NO_CHILD
    }
}

/// A single regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Tree {
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Walk from the root to a leaf and return its raw value.
    ///
    /// Structurally invalid trees (which [`Tree::validate`] rejects) evaluate
    /// to `0.0` instead of panicking or looping.
    pub fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };

            if node.is_leaf() {
                return node.leaf_value;
            }

            let Some(&feature_value) = usize::try_from(node.feature_index)
                .ok()
                .and_then(|i| features.get(i))
            else {
                return 0.0;
            };

            let next = if feature_value <= node.threshold {
                node.left
            } else {
                node.right
            };

            match usize::try_from(next) {
                Ok(next) if next > idx => idx = next,
                _ => return 0.0,
            }
        }
    }

    /// Validate tree structure against a feature vector of `feature_count` slots
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if !node.leaf_value.is_finite() {
                    return Err(format!("leaf {i} has non-finite value {}", node.leaf_value));
                }
                continue;
            }

            for (side, child) in [("left", node.left), ("right", node.right)] {
                match usize::try_from(child) {
                    Ok(c) if c > i && c < self.nodes.len() => {}
                    _ => {
                        return Err(format!("node {i} has invalid {side} child: {child}"));
                    }
                }
            }

            match usize::try_from(node.feature_index) {
                Ok(f) if f < feature_count => {}
                _ => {
                    return Err(format!(
                        "node {i} splits on feature {} but the model declares {feature_count}",
                        node.feature_index
                    ));
                }
            }

            if node.threshold.is_nan() {
                return Err(format!("node {i} has NaN threshold"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        // feature[0] <= 50 → 100, else 200
        Tree::new(vec![
            Node::internal(0, 50.0, 1, 2),
            Node::leaf(100.0),
            Node::leaf(200.0),
        ])
    }

    #[test]
    fn test_node_creation() {
        let internal = Node::internal(3, 1.5, 1, 2);
        assert_eq!(internal.feature_index, 3);
        assert!(!internal.is_leaf());

        let leaf = Node::leaf(-2.34);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.leaf_value, -2.34);
    }

    #[test]
    fn test_tree_evaluation() {
        let tree = stump();
        assert_eq!(tree.leaf_value(&[30.0]), 100.0);
        assert_eq!(tree.leaf_value(&[50.0]), 100.0); // Equal goes left
        assert_eq!(tree.leaf_value(&[60.0]), 200.0);
    }

    #[test]
    fn test_deeper_tree() {
        //        [0] <= 10
        //       /         \
        //   [1] <= 5      leaf 3
        //   /     \
        // leaf 1  leaf 2
        let tree = Tree::new(vec![
            Node::internal(0, 10.0, 1, 4),
            Node::internal(1, 5.0, 2, 3),
            Node::leaf(1.0),
            Node::leaf(2.0),
            Node::leaf(3.0),
        ]);
        assert_eq!(tree.leaf_value(&[10.0, 5.0]), 1.0);
        assert_eq!(tree.leaf_value(&[10.0, 5.5]), 2.0);
        assert_eq!(tree.leaf_value(&[10.5, 0.0]), 3.0);
    }

    #[test]
    fn test_tree_validation() {
        assert!(stump().validate(1).is_ok());

        let out_of_bounds = Tree::new(vec![
            Node::internal(0, 50.0, 5, 2),
            Node::leaf(100.0),
            Node::leaf(200.0),
        ]);
        assert!(out_of_bounds.validate(1).is_err());

        let backwards = Tree::new(vec![
            Node::internal(0, 50.0, 1, 2),
            Node::internal(0, 10.0, 0, 2),
            Node::leaf(200.0),
        ]);
        assert!(backwards.validate(1).is_err());

        let half_leaf = Tree::new(vec![Node::internal(0, 50.0, 1, NO_CHILD), Node::leaf(1.0)]);
        assert!(half_leaf.validate(1).is_err());

        assert!(stump().validate(0).is_err());
        assert!(Tree::new(vec![]).validate(1).is_err());
    }

    #[test]
    fn test_invalid_structure_evaluates_to_zero() {
        let cyclic = Tree::new(vec![Node::internal(0, 50.0, 0, 0)]);
        assert_eq!(cyclic.leaf_value(&[1.0]), 0.0);
        assert_eq!(stump().leaf_value(&[]), 0.0);
    }

    #[test]
    fn test_deserializes_exported_nodes() {
        let json = r#"[
            {"feat": 1, "threshold": 250.5, "left": 1, "right": 2, "value": 3.2},
            {"feat": -2, "threshold": -2.0, "left": -1, "right": -1, "value": -12.5},
            {"feat": -2, "threshold": -2.0, "left": -1, "right": -1, "value": 40.0}
        ]"#;
        let tree: Tree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.nodes.len(), 3);
        assert!(tree.validate(2).is_ok());
        assert_eq!(tree.leaf_value(&[0.0, 250.5]), -12.5);
        assert_eq!(tree.leaf_value(&[0.0, 251.0]), 40.0);
    }
}
