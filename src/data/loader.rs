//! CSV loading and typed column access

use crate::error::{Result, ValuationError};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use super::{CATEGORICAL_COLUMNS, ID, NUMERIC_COLUMNS, PRICE, YEAR_BUILT};

/// Load the housing dataset from a CSV file and check its schema
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let start = Instant::now();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| ValuationError::DataError(format!("{}: {}", path.display(), e)))?
        .finish()
        .map_err(|e| ValuationError::DataError(format!("{}: {}", path.display(), e)))?;

    validate_dataset(&df)?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Dataset loaded"
    );

    Ok(df)
}

/// Check that every feature column and the target are present and well formed
pub fn validate_dataset(df: &DataFrame) -> Result<()> {
    if df.height() == 0 {
        return Err(ValuationError::DataError("dataset has no rows".to_string()));
    }

    for name in NUMERIC_COLUMNS.iter().chain([PRICE].iter()) {
        numeric_column(df, name)?;
    }
    for name in CATEGORICAL_COLUMNS.iter() {
        string_column(df, name)?;
    }

    if let Some(bad) = numeric_column(df, PRICE)?.into_iter().find(|p| *p <= 0.0) {
        return Err(ValuationError::DataError(format!(
            "{} must be positive, found {}",
            PRICE, bad
        )));
    }

    if let Some(bad) = numeric_column(df, YEAR_BUILT)?
        .into_iter()
        .find(|y| !(1000.0..=9999.0).contains(y) || y.fract() != 0.0)
    {
        return Err(ValuationError::DataError(format!(
            "{} must be a 4-digit year, found {}",
            YEAR_BUILT, bad
        )));
    }

    Ok(())
}

/// Read a column as `f64`, rejecting nulls
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| ValuationError::FeatureNotFound(name.to_string()))?;
    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| ValuationError::DataError(format!("{}: {}", name, e)))?;
    let ca = series.f64()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                ValuationError::DataError(format!("{}: missing value at row {}", name, row))
            })
        })
        .collect()
}

/// Read a column as owned strings, rejecting nulls
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| ValuationError::FeatureNotFound(name.to_string()))?;
    let ca = column.as_materialized_series().str().map_err(|e| {
        ValuationError::DataError(format!("{} is not a text column: {}", name, e))
    })?;

    ca.into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(str::to_string).ok_or_else(|| {
                ValuationError::DataError(format!("{}: missing value at row {}", name, row))
            })
        })
        .collect()
}

/// Drop the row identifier and split off the `Price` target
pub fn split_features_and_target(df: &DataFrame) -> Result<(DataFrame, Vec<f64>)> {
    let target = numeric_column(df, PRICE)?;

    let mut features = df.drop(PRICE)?;
    if features.get_column_names().iter().any(|c| c.as_str() == ID) {
        features = features.drop(ID)?;
    }

    Ok((features, target))
}
