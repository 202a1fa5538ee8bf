//! Regression tree grown with the variance-reduction (MSE) criterion

use crate::error::{Result, ValuationError};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Smallest squared-error reduction that still counts as a split
const MIN_GAIN: f64 = 1e-12;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        /// Squared-error reduction achieved by this split
        gain: f64,
    },
}

/// Best split found for one node
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create a new regressor tree
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ValuationError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        if n_samples == 0 || n_features == 0 {
            return Err(ValuationError::TrainingError(
                "cannot fit a tree on an empty matrix".to_string(),
            ));
        }

        self.n_features = n_features;

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();

        self.root = Some(self.build_tree(x, y, indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let value = indices.iter().map(|&i| y[i]).sum::<f64>() / n_samples as f64;

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || Self::is_pure(y, &indices);

        if should_stop {
            return TreeNode::Leaf { value, n_samples };
        }

        let Some(best) = self.find_best_split(x, y, &indices) else {
            return TreeNode::Leaf { value, n_samples };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[[i, best.feature_idx]] <= best.threshold);

        importances[best.feature_idx] += best.gain;

        let left = Box::new(self.build_tree(x, y, left_indices, depth + 1, importances));
        let right = Box::new(self.build_tree(x, y, right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            gain: best.gain,
        }
    }

    /// Scan every feature; ties keep the lowest feature index
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<SplitCandidate> {
        let mut best: Option<SplitCandidate> = None;
        for feature_idx in 0..x.ncols() {
            if let Some(candidate) = self.best_split_for_feature(x, y, indices, feature_idx) {
                if best.map_or(true, |b| candidate.gain > b.gain) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Sorted sweep over one feature.
    ///
    /// The squared-error reduction of a split is
    /// `sum_l²/n_l + sum_r²/n_r - sum²/n`, so only running sums are needed.
    fn best_split_for_feature(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        feature_idx: usize,
    ) -> Option<SplitCandidate> {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x[[i, feature_idx]], y[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = pairs.len();
        let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
        let parent_proxy = total_sum * total_sum / n as f64;

        let mut left_sum = 0.0;
        let mut best: Option<SplitCandidate> = None;

        for k in 0..n - 1 {
            left_sum += pairs[k].1;

            if pairs[k].0 == pairs[k + 1].0 {
                continue;
            }

            let left_count = k + 1;
            let right_count = n - left_count;
            if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let gain = left_sum * left_sum / left_count as f64
                + right_sum * right_sum / right_count as f64
                - parent_proxy;

            if gain > MIN_GAIN && best.map_or(true, |b| gain > b.gain) {
                let mut threshold = (pairs[k].0 + pairs[k + 1].0) / 2.0;
                // midpoint of adjacent floats can round up to the right value
                if threshold >= pairs[k + 1].0 {
                    threshold = pairs[k].0;
                }
                best = Some(SplitCandidate {
                    feature_idx,
                    threshold,
                    gain,
                });
            }
        }

        best
    }

    fn is_pure(y: &Array1<f64>, indices: &[usize]) -> bool {
        let first = y[indices[0]];
        indices.iter().all(|&i| (y[i] - first).abs() < 1e-10)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(ValuationError::ModelNotFitted)?;
        self.check_width(x.ncols())?;

        Ok(x.rows()
            .into_iter()
            .map(|row| Self::predict_sample(root, &row))
            .collect())
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features {
            return Err(ValuationError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", width),
            });
        }
        Ok(())
    }

    fn predict_sample(mut node: &TreeNode, sample: &ArrayView1<f64>) -> f64 {
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    node = if sample[*feature_idx] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth
    pub fn get_depth(&self) -> usize {
        self.root.as_ref().map_or(0, Self::node_depth)
    }

    fn node_depth(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => {
                1 + Self::node_depth(left).max(Self::node_depth(right))
            }
        }
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Self::count_leaves)
    }

    fn count_leaves(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => {
                Self::count_leaves(left) + Self::count_leaves(right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_regressor_memorises_training_data() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        let predictions = tree.predict(&x).unwrap();
        for (p, a) in predictions.iter().zip(y.iter()) {
            assert!((p - a).abs() < 1e-12, "{} vs {}", p, a);
        }
        assert_eq!(tree.get_n_leaves(), 5);
    }

    #[test]
    fn test_step_function_single_split() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![5.0, 5.0, 5.0, 20.0, 20.0, 20.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.get_depth(), 2);
        assert_eq!(tree.get_n_leaves(), 2);
        assert_eq!(tree.predict(&array![[6.4]]).unwrap()[0], 5.0);
        assert_eq!(tree.predict(&array![[6.6]]).unwrap()[0], 20.0);
    }

    #[test]
    fn test_max_depth() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let mut tree = DecisionTree::new().with_max_depth(1);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.get_depth(), 2);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 100.0];

        let mut tree = DecisionTree::new().with_min_samples_leaf(2);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.get_n_leaves(), 2);
    }

    #[test]
    fn test_feature_importances() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        let importances = tree.feature_importances().unwrap();
        assert!((importances[0] - 1.0).abs() < 1e-12);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_root_splits_on_strongest_feature() {
        // column 0 only half-separates the targets, column 2 separates them fully
        let x = array![
            [0.0, 5.0, 1.0],
            [1.0, 5.0, 2.0],
            [0.0, 5.0, 3.0],
            [1.0, 5.0, 10.0],
            [0.0, 5.0, 11.0],
            [1.0, 5.0, 12.0]
        ];
        let y = array![0.0, 0.0, 0.0, 50.0, 50.0, 50.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        match tree.root.as_ref().unwrap() {
            TreeNode::Split { feature_idx, threshold, .. } => {
                assert_eq!(*feature_idx, 2);
                assert_eq!(*threshold, 6.5);
            }
            TreeNode::Leaf { .. } => panic!("expected a split at the root"),
        }
        assert_eq!(tree.get_n_leaves(), 2);
    }

    #[test]
    fn test_single_sample_is_a_leaf() {
        let mut tree = DecisionTree::new();
        tree.fit(&array![[1.0]], &array![7.0]).unwrap();
        assert_eq!(tree.predict(&array![[100.0]]).unwrap()[0], 7.0);
    }

    #[test]
    fn test_errors() {
        let tree = DecisionTree::new();
        assert!(matches!(tree.predict(&array![[1.0]]), Err(ValuationError::ModelNotFitted)));

        let mut tree = DecisionTree::new();
        assert!(matches!(
            tree.fit(&array![[1.0], [2.0]], &array![1.0]),
            Err(ValuationError::ShapeError { .. })
        ));

        tree.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            tree.predict(&array![[1.0, 2.0]]),
            Err(ValuationError::ShapeError { .. })
        ));
    }
}
