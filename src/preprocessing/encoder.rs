//! One-hot encoding of categorical columns

use crate::data::string_column;
use crate::error::{Result, ValuationError};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Vocabulary learned for one categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub column: String,
    /// Distinct labels, sorted
    pub categories: Vec<String>,
}

/// One-hot encoder
///
/// Each fitted column expands into one indicator per category. Labels that
/// were not seen during fitting are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Encoder {
    mappings: Vec<CategoryMapping>,
    is_fitted: bool,
}

impl Encoder {
    /// Create a new, unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the vocabulary of each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        let mappings = columns
            .iter()
            .map(|name| {
                let values = string_column(df, name)?;
                let categories: Vec<String> = values
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                Ok(CategoryMapping {
                    column: name.to_string(),
                    categories,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.mappings = mappings;
        self.is_fitted = true;
        Ok(self)
    }

    /// Expand the fitted columns into an indicator matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ValuationError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.n_output_features()));
        let mut offset = 0;

        for mapping in &self.mappings {
            let values = string_column(df, &mapping.column)?;
            for (i, label) in values.iter().enumerate() {
                let idx = mapping
                    .categories
                    .binary_search(label)
                    .map_err(|_| {
                        ValuationError::PreprocessingError(format!(
                            "unknown category {:?} in column {}",
                            label, mapping.column
                        ))
                    })?;
                out[[i, offset + idx]] = 1.0;
            }
            offset += mapping.categories.len();
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Output column names, `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.mappings
            .iter()
            .flat_map(|m| {
                m.categories
                    .iter()
                    .map(move |c| format!("{}_{}", m.column, c))
            })
            .collect()
    }

    /// Total number of indicator columns
    pub fn n_output_features(&self) -> usize {
        self.mappings.iter().map(|m| m.categories.len()).sum()
    }
}
