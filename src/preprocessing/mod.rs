//! Feature preprocessing
//!
//! Provides the transform applied before the regressor:
//! - Standard scaling of numeric columns
//! - One-hot encoding of categorical columns
//! - A column pipeline joining both into one model input matrix

mod encoder;
mod pipeline;
mod scaler;

pub use encoder::{CategoryMapping, Encoder};
pub use pipeline::FeaturePreprocessor;
pub use scaler::{Scaler, ScalerParams};
