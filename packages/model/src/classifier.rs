//! Decision tree classifier with per-leaf class distributions
//!
//! Fitting and class prediction go through [`linfa_trees`]. The linfa tree
//! only stores the winning class per leaf, so at fit time every training row
//! is routed to its leaf once and the class counts are kept next to the
//! tree. Those counts give the class probabilities used as confidence.

use crate::error::{MoodError, Result};
use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_trees::{DecisionTree, TreeNode};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hyperparameters forwarded to the linfa tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth of the tree. None means unlimited.
    pub max_depth: Option<usize>,
    /// Minimum number of samples required to split a node
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoodClassifier {
    tree: DecisionTree<f64, usize>,
    n_features: usize,
    n_classes: usize,
    /// Training class counts keyed by leaf path (`L`/`R` per level from the root)
    leaf_distributions: HashMap<String, Vec<f64>>,
}

impl MoodClassifier {
    /// Fit on `records` (one row per sample) against encoded `targets`.
    ///
    /// Every target must be below `n_classes`.
    pub fn fit(
        records: &Array2<f64>,
        targets: &Array1<usize>,
        n_classes: usize,
        params: TreeParams,
    ) -> Result<Self> {
        if records.nrows() == 0 {
            return Err(MoodError::Training("no training rows".to_string()));
        }
        if records.nrows() != targets.len() {
            return Err(MoodError::Training(format!(
                "{} rows but {} targets",
                records.nrows(),
                targets.len()
            )));
        }
        if let Some(bad) = targets.iter().find(|&&t| t >= n_classes) {
            return Err(MoodError::Training(format!(
                "target {bad} out of range for {n_classes} classes"
            )));
        }

        let ds = DatasetBase::from(records.clone()).with_targets(targets.clone());

        let mut tree_params = DecisionTree::<f64, usize>::params();
        if let Some(max_depth) = params.max_depth.filter(|d| *d > 0) {
            tree_params = tree_params.max_depth(Some(max_depth));
        }
        if params.min_samples_split > 0 {
            tree_params = tree_params.min_weight_split(params.min_samples_split as f32);
        }
        let tree = tree_params
            .fit(&ds)
            .map_err(|e| MoodError::Training(e.to_string()))?;

        let mut leaf_distributions: HashMap<String, Vec<f64>> = HashMap::new();
        for (row, &target) in records.outer_iter().zip(targets.iter()) {
            let (path, _) = descend(tree.root_node(), row)?;
            let counts = leaf_distributions
                .entry(path)
                .or_insert_with(|| vec![0.0; n_classes]);
            counts[target] += 1.0;
        }

        Ok(Self {
            tree,
            n_features: records.ncols(),
            n_classes,
            leaf_distributions,
        })
    }

    /// Predicted class index per row.
    pub fn predict(&self, rows: &Array2<f64>) -> Result<Array1<usize>> {
        self.check_width(rows.ncols())?;
        let dataset = DatasetBase::from(rows.clone());
        let predictions: Array1<usize> = self.tree.predict(&dataset);
        if predictions.len() != rows.nrows() {
            return Err(MoodError::ModelInvocation(format!(
                "expected {} predictions, got {}",
                rows.nrows(),
                predictions.len()
            )));
        }
        Ok(predictions)
    }

    /// Class probability distribution for a single row; sums to 1.
    pub fn predict_proba(&self, row: ArrayView1<f64>) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        let (path, leaf) = descend(self.tree.root_node(), row)?;

        if let Some(counts) = self.leaf_distributions.get(&path) {
            let total: f64 = counts.iter().sum();
            if total > 0.0 {
                return Ok(counts.iter().map(|c| c / total).collect());
            }
        }

        // Leaf never reached during training: all mass on the leaf's class.
        let class = leaf
            .prediction()
            .ok_or_else(|| MoodError::ModelInvocation(format!("node `{path}` is not a leaf")))?;
        let mut proba = vec![0.0; self.n_classes];
        let slot = proba.get_mut(class).ok_or_else(|| {
            MoodError::ModelInvocation(format!("leaf class {class} out of range"))
        })?;
        *slot = 1.0;
        Ok(proba)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Depth of the deepest leaf (root only = 0) and the number of leaves.
    pub fn shape(&self) -> (usize, usize) {
        let mut depth = 0;
        let mut leaves = 0;
        let mut stack = vec![(self.tree.root_node(), 0usize)];
        while let Some((node, level)) = stack.pop() {
            if node.is_leaf() {
                depth = depth.max(level);
                leaves += 1;
                continue;
            }
            for child in node.children().into_iter().flatten() {
                stack.push((&**child, level + 1));
            }
        }
        (depth, leaves)
    }

    /// Structural checks run after deserialization.
    pub(crate) fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        if self.n_features != n_features {
            return Err(MoodError::ArtifactLoad(format!(
                "classifier expects {} features, artifact lists {}",
                self.n_features, n_features
            )));
        }
        if self.n_classes != n_classes {
            return Err(MoodError::ArtifactLoad(format!(
                "classifier knows {} classes, label encoder has {}",
                self.n_classes, n_classes
            )));
        }
        if let Some((path, _)) = self
            .leaf_distributions
            .iter()
            .find(|(_, counts)| counts.len() != n_classes)
        {
            return Err(MoodError::ArtifactLoad(format!(
                "leaf `{path}` distribution does not match class count"
            )));
        }

        let mut stack = vec![self.tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                if node.prediction().is_some_and(|c| c >= n_classes) {
                    return Err(MoodError::ArtifactLoad(
                        "leaf predicts an unknown class".to_string(),
                    ));
                }
                continue;
            }
            let (feature_idx, _, _) = node.split();
            if feature_idx >= n_features {
                return Err(MoodError::ArtifactLoad(format!(
                    "split on feature index {feature_idx} outside of {n_features} features"
                )));
            }
            let children: Vec<_> = node.children().into_iter().flatten().collect();
            if children.len() != 2 {
                return Err(MoodError::ArtifactLoad(
                    "internal node without two children".to_string(),
                ));
            }
            stack.extend(children.into_iter().map(|c| &**c));
        }
        Ok(())
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features {
            return Err(MoodError::ModelInvocation(format!(
                "expected {} feature columns, got {}",
                self.n_features, width
            )));
        }
        Ok(())
    }
}

/// Follow the splits for `row` down to a leaf, same rule as linfa's predict:
/// values below the split go left.
fn descend<'a>(
    root: &'a TreeNode<f64, usize>,
    row: ArrayView1<f64>,
) -> Result<(String, &'a TreeNode<f64, usize>)> {
    let mut node = root;
    let mut path = String::new();
    while !node.is_leaf() {
        let (feature_idx, split_value, _) = node.split();
        let value = *row.get(feature_idx).ok_or_else(|| {
            MoodError::ModelInvocation(format!("row has no column {feature_idx}"))
        })?;
        let children = node.children();
        let (child, step) = if value < split_value {
            (children[0], 'L')
        } else {
            (children[1], 'R')
        };
        node = child
            .as_deref()
            .ok_or_else(|| MoodError::ModelInvocation(format!("missing child at `{path}`")))?;
        path.push(step);
    }
    Ok((path, node))
}
