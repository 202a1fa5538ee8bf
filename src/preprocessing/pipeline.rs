//! Column-wise preprocessing pipeline
//!
//! Numeric columns are standardised, categorical columns are one-hot
//! encoded, and the two blocks are concatenated numeric-first.

use crate::error::{Result, ValuationError};
use super::{encoder::Encoder, scaler::Scaler};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Fitted feature transform shared by training and inference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturePreprocessor {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    scaler: Scaler,
    encoder: Encoder,
    is_fitted: bool,
}

impl FeaturePreprocessor {
    /// Create a preprocessor for the given numeric and categorical columns
    pub fn new(numeric_columns: &[&str], categorical_columns: &[&str]) -> Self {
        Self {
            numeric_columns: numeric_columns.iter().map(|s| s.to_string()).collect(),
            categorical_columns: categorical_columns.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Fit the scaler and the encoder
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        if df.height() == 0 {
            return Err(ValuationError::PreprocessingError(
                "cannot fit on an empty frame".to_string(),
            ));
        }

        let numeric: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();
        let categorical: Vec<&str> = self.categorical_columns.iter().map(|s| s.as_str()).collect();

        self.scaler.fit(df, &numeric)?;
        self.encoder.fit(df, &categorical)?;

        self.is_fitted = true;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            numeric = self.numeric_columns.len(),
            categorical = self.categorical_columns.len(),
            output_features = self.n_output_features(),
            "Preprocessor fitted"
        );
        Ok(self)
    }

    /// Transform a frame into the model input matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotFitted);
        }

        let numeric = self.scaler.transform(df)?;
        let categorical = self.encoder.transform(df)?;

        Ok(concatenate![Axis(1), numeric, categorical])
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Names of the transformed columns, in matrix order
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .cloned()
            .chain(self.encoder.feature_names())
            .collect()
    }

    /// Width of the transformed matrix
    pub fn n_output_features(&self) -> usize {
        self.numeric_columns.len() + self.encoder.n_output_features()
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
