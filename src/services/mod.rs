pub mod analysis;
pub mod sentiment;
pub mod signals;

pub use analysis::InstrumentAnalyzer;
pub use sentiment::MarketAnalyzer;
pub use signals::{IndicatorEngine, LevelForecaster, SignalClassifier};
