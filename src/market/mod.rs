//! Market statistics derived once from the sales history
//!
//! The service shows three figures next to every valuation: the yearly
//! average price series since [`CHART_START_YEAR`], the compound annual
//! growth between the ends of that series, and the market-average monthly
//! rent.

use crate::data::{numeric_column, PRICE, YEAR_BUILT};
use crate::error::{Result, ValuationError};
use crate::utils::{round_half_even, round_to};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// First year shown on the chart ("past 20 years" from 2025)
pub const CHART_START_YEAR: i64 = 2005;

/// Growth reported when the chart has fewer than two points, in percent
pub const FALLBACK_GROWTH_PCT: f64 = 5.5;

/// Monthly rent as a fraction of the price
pub const RENT_RATIO: f64 = 0.0055;

/// Average sale price for one construction year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyAverage {
    pub year: i64,
    pub price: f64,
}

/// Process-wide statistics, immutable once computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Mean price over every record
    pub average_price: f64,
    /// `round(average_price * RENT_RATIO)`
    pub average_rent: i64,
    /// CAGR across the chart series, percent with one decimal
    pub growth_pct: f64,
    /// Yearly averages from `CHART_START_YEAR`, ascending
    pub chart: Vec<YearlyAverage>,
}

impl MarketStats {
    /// Compute the statistics from the `YearBuilt` and `Price` columns
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let years = numeric_column(df, YEAR_BUILT)?;
        let prices = numeric_column(df, PRICE)?;
        Self::from_sales(&years, &prices)
    }

    /// Compute the statistics from parallel year/price slices
    pub fn from_sales(years: &[f64], prices: &[f64]) -> Result<Self> {
        if years.len() != prices.len() {
            return Err(ValuationError::ShapeError {
                expected: format!("{} prices", years.len()),
                actual: format!("{} prices", prices.len()),
            });
        }
        if prices.is_empty() {
            return Err(ValuationError::DataError(
                "no sales to compute market statistics from".to_string(),
            ));
        }

        let average_price = prices.iter().sum::<f64>() / prices.len() as f64;
        let chart = yearly_averages(years, prices, CHART_START_YEAR);

        Ok(Self {
            average_price,
            average_rent: monthly_rent(average_price),
            growth_pct: compound_growth_pct(&chart),
            chart,
        })
    }

    /// Plotly figure (`data` + `layout`) for the price-trend chart
    pub fn chart_json(&self) -> Value {
        let years: Vec<i64> = self.chart.iter().map(|p| p.year).collect();
        let prices: Vec<f64> = self.chart.iter().map(|p| p.price).collect();

        json!({
            "data": [{
                "x": years,
                "y": prices,
                "type": "scatter",
                "mode": "lines+markers",
                "name": "Avg Price",
                "line": {"color": "#fbbf24", "width": 4},
                "marker": {"size": 8, "color": "#fbbf24"}
            }],
            "layout": {
                "title": {"text": "Price Fluctuations (Past 20 Years)", "font": {"color": "#f1f5f9", "size": 18}},
                "xaxis": {"title": {"text": "Year"}, "color": "#f1f5f9"},
                "yaxis": {"title": {"text": "Avg Price ($)"}, "color": "#f1f5f9"},
                "template": "plotly_dark",
                "paper_bgcolor": "rgba(0,0,0,0)",
                "plot_bgcolor": "rgba(30,41,59,0.8)",
                "font": {"color": "#f1f5f9"},
                "hovermode": "x unified",
                "height": 400,
                "margin": {"l": 50, "r": 20, "t": 60, "b": 50},
                "legend": {"bgcolor": "rgba(30,41,59,0.9)"}
            }
        })
    }
}

/// Monthly rent for a price, rounded half to even
pub fn monthly_rent(price: f64) -> i64 {
    round_half_even(price * RENT_RATIO)
}

/// Mean price per year for years `>= start_year`, ascending by year
pub fn yearly_averages(years: &[f64], prices: &[f64], start_year: i64) -> Vec<YearlyAverage> {
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for (&year, &price) in years.iter().zip(prices) {
        let entry = buckets.entry(year as i64).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    buckets
        .range(start_year..)
        .map(|(&year, &(sum, count))| YearlyAverage {
            year,
            price: sum / count as f64,
        })
        .collect()
}

/// CAGR between the first and last points, percent rounded to one decimal
///
/// Falls back to [`FALLBACK_GROWTH_PCT`] when there are fewer than two points.
pub fn compound_growth_pct(series: &[YearlyAverage]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return FALLBACK_GROWTH_PCT;
    };
    if series.len() < 2 {
        return FALLBACK_GROWTH_PCT;
    }

    let span = (last.year - first.year) as f64;
    let cagr = (last.price / first.price).powf(1.0 / span) - 1.0;
    round_to(cagr * 100.0, 1)
}
