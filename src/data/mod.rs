//! Housing dataset schema and loading
//!
//! The dataset has one row per historical sale: five numeric attributes,
//! three categorical attributes, a `Price` target and an `Id` row identifier.

mod loader;

pub use loader::{
    load_dataset, numeric_column, split_features_and_target, string_column, validate_dataset,
};

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const ID: &str = "Id";
pub const PRICE: &str = "Price";

pub const AREA: &str = "Area";
pub const BEDROOMS: &str = "Bedrooms";
pub const BATHROOMS: &str = "Bathrooms";
pub const FLOORS: &str = "Floors";
pub const YEAR_BUILT: &str = "YearBuilt";

pub const LOCATION: &str = "Location";
pub const CONDITION: &str = "Condition";
pub const GARAGE: &str = "Garage";

/// Numeric feature columns, in model input order
pub const NUMERIC_COLUMNS: [&str; 5] = [AREA, BEDROOMS, BATHROOMS, FLOORS, YEAR_BUILT];

/// Categorical feature columns, in model input order
pub const CATEGORICAL_COLUMNS: [&str; 3] = [LOCATION, CONDITION, GARAGE];

/// One house described by the same attributes as a training record, minus `Price`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseFeatures {
    pub area: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub floors: i64,
    pub year_built: i64,
    pub location: String,
    pub condition: String,
    pub garage: String,
}

impl HouseFeatures {
    /// Build the single-row feature table the model consumes
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = df!(
            AREA => [self.area],
            BEDROOMS => [self.bedrooms],
            BATHROOMS => [self.bathrooms],
            FLOORS => [self.floors],
            YEAR_BUILT => [self.year_built],
            LOCATION => [self.location.as_str()],
            CONDITION => [self.condition.as_str()],
            GARAGE => [self.garage.as_str()]
        )?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HouseFeatures {
        HouseFeatures {
            area: 3200,
            bedrooms: 3,
            bathrooms: 2,
            floors: 2,
            year_built: 2005,
            location: "Suburban".to_string(),
            condition: "Good".to_string(),
            garage: "Yes".to_string(),
        }
    }

    #[test]
    fn test_to_frame_has_one_row_and_all_features() {
        let df = sample().to_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), NUMERIC_COLUMNS.len() + CATEGORICAL_COLUMNS.len());
        for name in NUMERIC_COLUMNS.iter().chain(CATEGORICAL_COLUMNS.iter()) {
            assert!(df.column(name).is_ok(), "missing column {}", name);
        }
    }

    #[test]
    fn test_to_frame_values() {
        let df = sample().to_frame().unwrap();
        assert_eq!(numeric_column(&df, AREA).unwrap(), vec![3200.0]);
        assert_eq!(string_column(&df, LOCATION).unwrap(), vec!["Suburban".to_string()]);
    }
}
