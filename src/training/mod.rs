//! Model training
//!
//! Provides the regression stack behind the valuation service:
//! - Regression trees grown on squared-error reduction
//! - A bootstrap random forest averaging those trees
//! - `ValuationModel`, the preprocessing + forest artifact the trainer persists

pub mod decision_tree;
mod engine;
mod metrics;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{train_from_csv, ModelMetadata, TrainerConfig, ValuationModel};
pub use metrics::ModelMetrics;
pub use random_forest::RandomForest;
