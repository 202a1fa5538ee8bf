//! Standard (z-score) scaling of numeric columns

use crate::data::numeric_column;
use crate::error::{Result, ValuationError};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters learned for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub column: String,
    /// Column mean
    pub center: f64,
    /// Population standard deviation, 1.0 for a constant column
    pub scale: f64,
}

/// Feature scaler: `(x - mean) / std`
///
/// Columns keep the order they were fitted in, so the transformed matrix has
/// a stable layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scaler {
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new, unfitted scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn mean and standard deviation for each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        let params = columns
            .iter()
            .map(|name| {
                let values = numeric_column(df, name)?;
                Self::compute_params(name, &values)
            })
            .collect::<Result<Vec<_>>>()?;

        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns into an `n_rows x n_columns` matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.params.len()));
        for (j, params) in self.params.iter().enumerate() {
            let values = numeric_column(df, &params.column)?;
            for (i, v) in values.into_iter().enumerate() {
                out[[i, j]] = (v - params.center) / params.scale;
            }
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_params(name: &str, values: &[f64]) -> Result<ScalerParams> {
        if values.is_empty() {
            return Err(ValuationError::PreprocessingError(format!(
                "cannot scale empty column {}",
                name
            )));
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();

        Ok(ScalerParams {
            column: name.to_string(),
            center: mean,
            scale: if std < 10.0 * f64::EPSILON * mean.abs().max(1.0) { 1.0 } else { std },
        })
    }
}
