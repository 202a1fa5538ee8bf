//! LUXE House AI - random-forest house valuation
//!
//! This crate provides:
//! - An offline trainer that fits a preprocessing + random forest pipeline
//!   on a sales history and persists it as one artifact
//! - A web service that values a single house per form submission and shows
//!   the result next to a historical price-trend chart
//!
//! # Modules
//!
//! ## Model
//! - [`data`] - Dataset loading, validation and the feature row type
//! - [`preprocessing`] - Standard scaling and one-hot encoding
//! - [`training`] - Decision trees, the random forest and the model artifact
//!
//! ## Domain
//! - [`market`] - Yearly price series, growth and rent statistics
//! - [`valuation`] - Form parsing, price range and rent estimate
//!
//! ## Services
//! - [`server`] - HTTP server rendering the valuation page
//! - [`cli`] - Command-line interface
//!
//! ## Utilities
//! - [`utils`] - Rounding and number formatting

// Core error handling
pub mod error;

// Model
pub mod data;
pub mod preprocessing;
pub mod training;

// Domain
pub mod market;
pub mod valuation;

// Services
pub mod server;
pub mod cli;

pub mod utils;

pub use error::{Result, ValuationError};

/// Re-exports for convenient use
pub mod prelude {
    pub use crate::error::{Result, ValuationError};

    pub use crate::data::{load_dataset, HouseFeatures};
    pub use crate::preprocessing::FeaturePreprocessor;
    pub use crate::training::{train_from_csv, RandomForest, TrainerConfig, ValuationModel};

    pub use crate::market::MarketStats;
    pub use crate::valuation::{appraise, PricePredictor, Valuation, ValuationForm};

    pub use crate::server::{create_router, AppState, ServerConfig};
}
