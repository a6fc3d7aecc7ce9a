//! Tapeline - intraday signal, price-level and market-sentiment analysis

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use config::Config;
use services::{InstrumentAnalyzer, MarketAnalyzer};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub instruments: Arc<InstrumentAnalyzer>,
    pub market: Arc<MarketAnalyzer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            instruments: Arc::new(InstrumentAnalyzer::new(&config.indicators)),
            market: Arc::new(MarketAnalyzer::new(config.sector_top_n)),
            config: Arc::new(config),
        }
    }
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
