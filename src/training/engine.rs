//! Valuation model: fitted preprocessing plus random forest, persisted as one artifact

use crate::data::{
    self, split_features_and_target, HouseFeatures, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS,
};
use crate::error::{Result, ValuationError};
use crate::preprocessing::FeaturePreprocessor;
use super::{metrics::ModelMetrics, random_forest::RandomForest};
use chrono::{DateTime, Utc};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Forest hyperparameters used by the trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Seed for bootstrap sampling
    pub random_state: u64,
    /// Maximum depth per tree, unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum samples to split a node
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            random_state: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TrainerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the number of trees
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Builder method to set the random seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Builder method to cap tree depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Provenance stored next to the fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub created_at: DateTime<Utc>,
    pub crate_version: String,
    pub feature_names: Vec<String>,
    pub config: TrainerConfig,
    /// In-sample metrics
    pub metrics: ModelMetrics,
}

/// Fitted transform and regressor, read-only once trained
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationModel {
    preprocessor: FeaturePreprocessor,
    forest: RandomForest,
    metadata: ModelMetadata,
}

impl ValuationModel {
    /// Fit on a dataset holding the feature columns and `Price`
    pub fn fit(df: &DataFrame, config: &TrainerConfig) -> Result<Self> {
        let start = Instant::now();

        let (features, target) = split_features_and_target(df)?;
        let y = Array1::from_vec(target);

        let mut preprocessor = FeaturePreprocessor::new(&NUMERIC_COLUMNS, &CATEGORICAL_COLUMNS);
        let x = preprocessor.fit_transform(&features)?;

        let mut forest = RandomForest::new(config.n_estimators)
            .with_random_state(config.random_state)
            .with_max_depth(config.max_depth)
            .with_min_samples_split(config.min_samples_split)
            .with_min_samples_leaf(config.min_samples_leaf);
        forest.fit(&x, &y)?;

        let training_time_secs = start.elapsed().as_secs_f64();

        let y_pred = forest.predict(&x)?;
        let metrics = ModelMetrics {
            training_time_secs,
            n_features: x.ncols(),
            ..ModelMetrics::compute_regression(&y, &y_pred)
        };

        info!(
            samples = metrics.n_samples,
            features = metrics.n_features,
            trees = forest.n_trees(),
            r2 = metrics.r2,
            mae = metrics.mae,
            elapsed_secs = training_time_secs,
            "Valuation model fitted"
        );

        let metadata = ModelMetadata {
            created_at: Utc::now(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            feature_names: preprocessor.feature_names(),
            config: config.clone(),
            metrics,
        };

        Ok(Self {
            preprocessor,
            forest,
            metadata,
        })
    }

    /// Predict prices for every row of a feature frame
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.preprocessor.transform(df)?;
        self.forest
            .predict(&x)
            .map_err(|e| ValuationError::InferenceError(e.to_string()))
    }

    /// Predict the price of one house
    pub fn predict_one(&self, house: &HouseFeatures) -> Result<f64> {
        let predictions = self.predict(&house.to_frame()?)?;
        predictions
            .get(0)
            .copied()
            .filter(|p| p.is_finite())
            .ok_or_else(|| ValuationError::InferenceError("no finite prediction".to_string()))
    }

    /// Feature importances paired with their names, most important first
    pub fn feature_importances(&self) -> Vec<(String, f64)> {
        let Some(importances) = self.forest.feature_importances() else {
            return Vec::new();
        };

        let mut ranked: Vec<(String, f64)> = self
            .metadata
            .feature_names
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn metrics(&self) -> &ModelMetrics {
        &self.metadata.metrics
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Write the model artifact
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;

        info!(path = %path.display(), "Model artifact written");
        Ok(())
    }

    /// Read a model artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let model: Self = bincode::deserialize_from(reader)?;

        if !model.preprocessor.is_fitted() || model.forest.n_trees() == 0 {
            return Err(ValuationError::ModelNotFitted);
        }

        info!(
            path = %path.display(),
            trees = model.forest.n_trees(),
            created_at = %model.metadata.created_at.to_rfc3339(),
            written_by = %model.metadata.crate_version,
            "Model artifact loaded"
        );
        Ok(model)
    }
}

/// Offline trainer: read the dataset, fit, persist
pub fn train_from_csv(
    data_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &TrainerConfig,
) -> Result<ValuationModel> {
    let df = data::load_dataset(data_path)?;
    let model = ValuationModel::fit(&df, config)?;
    model.save(output_path)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        let n = 24;
        let locations = ["Downtown", "Suburban", "Urban", "Rural"];
        let conditions = ["Poor", "Fair", "Good", "Excellent"];

        let area: Vec<i64> = (0..n).map(|i| 1000 + 150 * i as i64).collect();
        let price: Vec<f64> = area.iter().map(|a| *a as f64 * 100.0).collect();

        df!(
            "Id" => (1..=n as i64).collect::<Vec<_>>(),
            "Area" => area,
            "Bedrooms" => (0..n).map(|i| 1 + (i % 5) as i64).collect::<Vec<_>>(),
            "Bathrooms" => (0..n).map(|i| 1 + (i % 4) as i64).collect::<Vec<_>>(),
            "Floors" => (0..n).map(|i| 1 + (i % 3) as i64).collect::<Vec<_>>(),
            "YearBuilt" => (0..n).map(|i| 1990 + i as i64).collect::<Vec<_>>(),
            "Location" => (0..n).map(|i| locations[i % 4]).collect::<Vec<_>>(),
            "Condition" => (0..n).map(|i| conditions[i % 4]).collect::<Vec<_>>(),
            "Garage" => (0..n).map(|i| if i % 2 == 0 { "Yes" } else { "No" }).collect::<Vec<_>>(),
            "Price" => price
        )
        .unwrap()
    }

    fn config() -> TrainerConfig {
        TrainerConfig::new().with_n_estimators(10).with_random_state(42)
    }

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_fit_records_metadata() {
        let model = ValuationModel::fit(&frame(), &config()).unwrap();

        let meta = model.metadata();
        // 5 numeric + 4 locations + 4 conditions + 2 garage values
        assert_eq!(meta.feature_names.len(), 15);
        assert_eq!(meta.feature_names[0], "Area");
        assert_eq!(meta.metrics.n_samples, 24);
        assert!(meta.metrics.r2 > 0.8, "r2 too low: {}", meta.metrics.r2);
        assert_eq!(model.forest().n_trees(), 10);
    }

    #[test]
    fn test_predict_one_is_positive() {
        let model = ValuationModel::fit(&frame(), &config()).unwrap();
        let house = HouseFeatures {
            area: 3200,
            bedrooms: 3,
            bathrooms: 2,
            floors: 2,
            year_built: 2005,
            location: "Suburban".to_string(),
            condition: "Good".to_string(),
            garage: "Yes".to_string(),
        };
        let p = model.predict_one(&house).unwrap();
        assert!(p >= 100_000.0 && p <= 445_000.0, "prediction out of range: {}", p);
    }

    #[test]
    fn test_unknown_category_fails() {
        let model = ValuationModel::fit(&frame(), &config()).unwrap();
        let house = HouseFeatures {
            area: 3200,
            bedrooms: 3,
            bathrooms: 2,
            floors: 2,
            year_built: 2005,
            location: "Moon".to_string(),
            condition: "Good".to_string(),
            garage: "Yes".to_string(),
        };
        assert!(model.predict_one(&house).is_err());
    }

    #[test]
    fn test_feature_importances_ranked() {
        let model = ValuationModel::fit(&frame(), &config()).unwrap();
        let ranked = model.feature_importances();
        assert_eq!(ranked.len(), 15);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        let total: f64 = ranked.iter().map(|(_, v)| v).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load_predict_identically() {
        let model = ValuationModel::fit(&frame(), &config()).unwrap();
        let path = std::env::temp_dir().join(format!("luxe-engine-{}.bin", std::process::id()));

        model.save(&path).unwrap();
        let loaded = ValuationModel::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let (features, _) = split_features_and_target(&frame()).unwrap();
        assert_eq!(model.predict(&features).unwrap(), loaded.predict(&features).unwrap());
        assert_eq!(loaded.metadata().crate_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ValuationModel::load("/nonexistent/luxe/model.bin").unwrap_err();
        assert!(matches!(err, ValuationError::IoError(_)));
    }
}
