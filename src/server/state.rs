//! Application state shared across handlers

use std::sync::Arc;
use tracing::info;

use crate::data;
use crate::error::Result;
use crate::market::MarketStats;
use crate::training::ValuationModel;
use crate::valuation::PricePredictor;

use super::ServerConfig;

/// Immutable context built once at startup
pub struct AppState {
    pub predictor: Arc<dyn PricePredictor>,
    pub stats: MarketStats,
    /// Plotly figure serialized once for inline embedding
    pub chart_json: String,
}

impl AppState {
    pub fn new(predictor: Arc<dyn PricePredictor>, stats: MarketStats) -> Result<Self> {
        let chart_json = serde_json::to_string(&stats.chart_json())?;
        Ok(Self {
            predictor,
            stats,
            chart_json,
        })
    }

    /// Load the dataset and model artifact named by the configuration
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let df = data::load_dataset(&config.data_path)?;
        let stats = MarketStats::from_dataframe(&df)?;
        info!(
            records = df.height(),
            chart_points = stats.chart.len(),
            average_price = stats.average_price,
            growth_pct = stats.growth_pct,
            average_rent = stats.average_rent,
            "Market statistics computed"
        );

        let model = ValuationModel::load(&config.model_path)?;
        Self::new(Arc::new(model), stats)
    }
}
