//! Random forest regressor

use crate::error::{Result, ValuationError};
use super::decision_tree::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random Forest model
///
/// Every tree is grown on a bootstrap sample and considers every feature at
/// each split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Individual trees
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Random state
    pub random_state: Option<u64>,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
    /// Number of features
    n_features: usize,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    /// Create a new regressor forest
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            random_state: None,
            feature_importances: None,
            n_features: 0,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fit the forest to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ValuationError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        if n_samples == 0 {
            return Err(ValuationError::TrainingError(
                "cannot fit a forest on zero samples".to_string(),
            ));
        }

        if self.n_estimators == 0 {
            return Err(ValuationError::TrainingError(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        self.n_features = n_features;
        let base_seed = self.random_state.unwrap_or(42);

        // Each tree owns a seed derived from its index, so the result does
        // not depend on rayon's scheduling.
        let trees: Vec<DecisionTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> =
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot: Array1<f64> = sample_indices.iter().map(|&i| y[i]).collect();

                let mut tree = DecisionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf);
                tree.max_depth = self.max_depth;

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        self.trees = trees;
        self.compute_feature_importances();

        debug!(
            trees = self.trees.len(),
            max_depth = self.trees.iter().map(DecisionTree::get_depth).max().unwrap_or(0),
            leaves = self.trees.iter().map(DecisionTree::get_n_leaves).sum::<usize>(),
            "Forest grown"
        );

        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let mut total_importances = vec![0.0; self.n_features];

        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (i, &val) in imp.iter().enumerate() {
                    if i < self.n_features {
                        total_importances[i] += val;
                    }
                }
            }
        }

        // Normalize
        let total: f64 = total_importances.iter().sum();
        if total > 0.0 {
            for imp in &mut total_importances {
                *imp /= total;
            }
        }

        self.feature_importances = Some(Array1::from_vec(total_importances));
    }

    /// Mean prediction across all trees
    ///
    /// A single row is scored on the calling thread; larger batches fan out
    /// across the rayon pool.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(ValuationError::ModelNotFitted);
        }

        let all_predictions: Vec<Array1<f64>> = if x.nrows() <= 1 {
            self.trees
                .iter()
                .map(|tree| tree.predict(x))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.trees
                .par_iter()
                .map(|tree| tree.predict(x))
                .collect::<Result<Vec<_>>>()?
        };

        let mut sum = Array1::<f64>::zeros(x.nrows());
        for preds in &all_predictions {
            sum += preds;
        }

        Ok(sum / all_predictions.len() as f64)
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| if j == 0 { i as f64 } else { 0.0 });
        let y = Array1::from_shape_fn(40, |i| 3.0 * i as f64 + 10.0);
        (x, y)
    }

    #[test]
    fn test_regressor() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        let mut rf = RandomForest::new(10).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let predictions = rf.predict(&x).unwrap();

        let mse: f64 = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, a)| (p - a).powi(2))
            .sum::<f64>()
            / y.len() as f64;

        assert!(mse < 2.0, "MSE too high: {}", mse);
        assert_eq!(rf.n_trees(), 10);
    }

    #[test]
    fn test_seed_makes_fit_reproducible() {
        let (x, y) = linear_data();

        let mut a = RandomForest::new(8).with_random_state(7);
        let mut b = RandomForest::new(8).with_random_state(7);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_predictions_stay_within_target_range() {
        let (x, y) = linear_data();
        let mut rf = RandomForest::new(20).with_random_state(1);
        rf.fit(&x, &y).unwrap();

        let outside = array![[-100.0, 0.0], [1000.0, 0.0]];
        let preds = rf.predict(&outside).unwrap();
        let (lo, hi) = (10.0, 3.0 * 39.0 + 10.0);
        assert!(preds.iter().all(|p| *p >= lo && *p <= hi));
    }

    #[test]
    fn test_single_row_matches_batch() {
        let (x, y) = linear_data();
        let mut rf = RandomForest::new(12).with_random_state(5);
        rf.fit(&x, &y).unwrap();

        let batch = rf.predict(&x).unwrap();
        for i in [0, 17, 39] {
            let row = x.select(Axis(0), &[i]);
            let single = rf.predict(&row).unwrap();
            assert_eq!(single.len(), 1);
            assert_eq!(single[0], batch[i]);
        }
    }

    #[test]
    fn test_every_tree_sees_the_informative_feature() {
        // Columns 0..4 are short cycles with a little signal, column 4 separates
        // the classes exactly. Scanning every column, each root picks column 4.
        let x = Array2::from_shape_fn((30, 5), |(i, j)| {
            if j == 4 { i as f64 } else { (i % (j + 2)) as f64 }
        });
        let y = Array1::from_shape_fn(30, |i| if i < 15 { 0.0 } else { 100.0 });

        let mut rf = RandomForest::new(16).with_random_state(3);
        rf.fit(&x, &y).unwrap();

        for tree in &rf.trees {
            let importances = tree.feature_importances().unwrap();
            if importances.sum() > 0.0 {
                assert_eq!(importances[4], 1.0);
            }
        }
        assert_eq!(rf.feature_importances().unwrap()[4], 1.0);
    }

    #[test]
    fn test_feature_importances() {
        let (x, y) = linear_data();

        let mut rf = RandomForest::new(10).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let importances = rf.feature_importances().unwrap();
        assert_eq!(importances.len(), 2);
        assert!((importances.sum() - 1.0).abs() < 1e-9);
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_unfitted_and_invalid() {
        let rf = RandomForest::new(5);
        assert!(matches!(rf.predict(&array![[1.0]]), Err(ValuationError::ModelNotFitted)));

        let mut rf = RandomForest::new(0);
        assert!(matches!(
            rf.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]),
            Err(ValuationError::TrainingError(_))
        ));
    }
}
