//! Trading signals service module.
//!
//! Provides indicator series, bar-by-bar signal classification and
//! support/resistance forecasting for a single instrument.

pub mod classifier;
pub mod indicators;
pub mod levels;

pub use classifier::SignalClassifier;
pub use indicators::IndicatorEngine;
pub use levels::LevelForecaster;

use crate::types::{PricePoint, Series};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Minimum number of bars before the first defined value.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator series, aligned with `points`.
    fn calculate(&self, points: &[PricePoint]) -> Series;
}

/// Round to a fixed number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
