//! Valuation requests and responses
//!
//! Turns the submitted form into a [`HouseFeatures`] row, asks a
//! [`PricePredictor`] for a price, and derives the figures shown to the user:
//! a ±12% range and an estimated monthly rent.

use crate::data::HouseFeatures;
use crate::error::{Result, ValuationError};
use crate::market::monthly_rent;
use crate::training::ValuationModel;
use crate::utils::round_half_even;
use serde::{Deserialize, Serialize};

/// Half-width of the price range, as a fraction of the prediction
pub const RANGE_FRACTION: f64 = 0.12;

const DEFAULT_BEDROOMS: &str = "3";
const DEFAULT_BATHROOMS: &str = "2";

/// Anything that can price a house
pub trait PricePredictor: Send + Sync {
    fn predict_price(&self, house: &HouseFeatures) -> Result<f64>;
}

impl PricePredictor for ValuationModel {
    fn predict_price(&self, house: &HouseFeatures) -> Result<f64> {
        self.predict_one(house)
    }
}

/// Raw form fields as submitted by the browser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationForm {
    pub area: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub floors: Option<String>,
    pub yearbuilt: Option<String>,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub garage: Option<String>,
}

impl ValuationForm {
    /// Parse the fields into a feature row
    ///
    /// Bedrooms and bathrooms accept a trailing `+` ("6+") and default to
    /// 3 and 2 when absent. Category labels pass through unchanged.
    pub fn parse(&self) -> Result<HouseFeatures> {
        Ok(HouseFeatures {
            area: parse_int("area", required("area", &self.area)?)?,
            bedrooms: parse_count(
                "bedrooms",
                self.bedrooms.as_deref().unwrap_or(DEFAULT_BEDROOMS),
            )?,
            bathrooms: parse_count(
                "bathrooms",
                self.bathrooms.as_deref().unwrap_or(DEFAULT_BATHROOMS),
            )?,
            floors: parse_int("floors", required("floors", &self.floors)?)?,
            year_built: parse_int("yearbuilt", required("yearbuilt", &self.yearbuilt)?)?,
            location: required("location", &self.location)?.to_string(),
            condition: required("condition", &self.condition)?.to_string(),
            garage: required("garage", &self.garage)?.to_string(),
        })
    }
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ValuationError::invalid_input(field, "", "field is required"))
}

fn parse_int(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ValuationError::invalid_input(field, raw, e.to_string()))
}

fn parse_count(field: &str, raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    parse_int(field, trimmed.strip_suffix('+').unwrap_or(trimmed))
}

/// Figures derived from one prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    pub prediction: i64,
    pub lower: i64,
    pub upper: i64,
    pub rent: i64,
}

impl Valuation {
    /// Derive the rounded figures from the raw model output
    pub fn from_estimate(estimate: f64) -> Self {
        Self {
            prediction: round_half_even(estimate),
            lower: round_half_even(estimate * (1.0 - RANGE_FRACTION)),
            upper: round_half_even(estimate * (1.0 + RANGE_FRACTION)),
            rent: monthly_rent(estimate),
        }
    }
}

/// Parse a submission and price it
pub fn appraise(predictor: &dyn PricePredictor, form: &ValuationForm) -> Result<Valuation> {
    let house = form.parse()?;
    let estimate = predictor.predict_price(&house)?;
    Ok(Valuation::from_estimate(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl PricePredictor for Fixed {
        fn predict_price(&self, _house: &HouseFeatures) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn form() -> ValuationForm {
        ValuationForm {
            area: Some("3200".to_string()),
            bedrooms: Some("3".to_string()),
            bathrooms: Some("2".to_string()),
            floors: Some("2".to_string()),
            yearbuilt: Some("2005".to_string()),
            location: Some("Suburban".to_string()),
            condition: Some("Good".to_string()),
            garage: Some("Yes".to_string()),
        }
    }

    #[test]
    fn test_parse_full_form() {
        let house = form().parse().unwrap();
        assert_eq!(
            house,
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
        );
    }

    #[test]
    fn test_parse_strips_plus_suffix() {
        let mut f = form();
        f.bedrooms = Some("6+".to_string());
        f.bathrooms = Some("5+".to_string());
        let house = f.parse().unwrap();
        assert_eq!(house.bedrooms, 6);
        assert_eq!(house.bathrooms, 5);
    }

    #[test]
    fn test_parse_defaults_rooms() {
        let mut f = form();
        f.bedrooms = None;
        f.bathrooms = None;
        let house = f.parse().unwrap();
        assert_eq!((house.bedrooms, house.bathrooms), (3, 2));
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        let mut f = form();
        f.area = Some("big".to_string());
        assert!(matches!(
            f.parse(),
            Err(ValuationError::InvalidInput { ref field, .. }) if field == "area"
        ));

        let mut f = form();
        f.floors = Some("2.5".to_string());
        assert!(f.parse().is_err());

        let mut f = form();
        f.bedrooms = Some("+".to_string());
        assert!(f.parse().is_err());
    }

    #[test]
    fn test_parse_requires_fields() {
        let mut f = form();
        f.garage = None;
        assert!(matches!(
            f.parse(),
            Err(ValuationError::InvalidInput { ref field, .. }) if field == "garage"
        ));
        assert!(ValuationForm::default().parse().is_err());
    }

    #[test]
    fn test_bands_and_rent() {
        let v = Valuation::from_estimate(500_000.0);
        assert_eq!(v.prediction, 500_000);
        assert_eq!(v.lower, 440_000);
        assert_eq!(v.upper, 560_000);
        assert_eq!(v.rent, 2750);
    }

    #[test]
    fn test_bands_use_raw_estimate() {
        let estimate = 412_345.6789;
        let v = Valuation::from_estimate(estimate);
        assert_eq!(v.prediction, 412_346);
        assert_eq!(v.lower, (estimate * 0.88).round_ties_even() as i64);
        assert_eq!(v.upper, (estimate * 1.12).round_ties_even() as i64);
        assert_eq!(v.rent, (estimate * 0.0055).round_ties_even() as i64);
        assert!(v.lower <= v.prediction && v.prediction <= v.upper);
    }

    #[test]
    fn test_appraise() {
        let v = appraise(&Fixed(1_000_000.0), &form()).unwrap();
        assert_eq!(v, Valuation { prediction: 1_000_000, lower: 880_000, upper: 1_120_000, rent: 5500 });

        let mut bad = form();
        bad.yearbuilt = Some("".to_string());
        assert!(appraise(&Fixed(1.0), &bad).is_err());
    }
}
