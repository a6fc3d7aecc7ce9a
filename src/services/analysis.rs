//! Single-instrument analysis pipeline.

use crate::config::IndicatorConfig;
use crate::error::{AppError, Result};
use crate::services::signals::{IndicatorEngine, LevelForecaster, SignalClassifier};
use crate::types::{IndicatorFrame, InstrumentAnalysis, LevelForecast, PricePoint, PriceSeries, Signal};
use tracing::debug;

/// Runs indicators, signal classification and level forecasting over one
/// instrument's bars.
#[derive(Debug, Clone)]
pub struct InstrumentAnalyzer {
    engine: IndicatorEngine,
    classifier: SignalClassifier,
    forecaster: LevelForecaster,
    min_bars: usize,
}

impl Default for InstrumentAnalyzer {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

impl InstrumentAnalyzer {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            engine: IndicatorEngine::new(config.clone()),
            classifier: SignalClassifier::new(config),
            forecaster: LevelForecaster::new(config),
            min_bars: config.min_bars(),
        }
    }

    pub fn min_bars(&self) -> usize {
        self.min_bars
    }

    /// Validate the bars and compute the indicator frame.
    fn prepare(&self, points: Vec<PricePoint>) -> Result<(PriceSeries, IndicatorFrame)> {
        let series = PriceSeries::new(points)?;
        if series.len() < self.min_bars {
            return Err(AppError::missing(format!(
                "need at least {} bars, got {}",
                self.min_bars,
                series.len()
            )));
        }

        let frame = self.engine.compute(series.points());
        Ok((series, frame))
    }

    /// Buy/sell signals in time order.
    pub fn signals(&self, points: Vec<PricePoint>) -> Result<Vec<Signal>> {
        let (series, frame) = self.prepare(points)?;
        Ok(self.classifier.classify(series.points(), &frame))
    }

    /// Support/resistance levels at the latest bar.
    pub fn levels(&self, points: Vec<PricePoint>) -> Result<LevelForecast> {
        let (series, frame) = self.prepare(points)?;
        self.forecaster
            .forecast(series.points(), &frame)
            .ok_or_else(|| AppError::missing("latest bar lacks the values a level forecast needs"))
    }

    /// Signals, levels and the latest indicator values together.
    pub fn analyze(&self, points: Vec<PricePoint>) -> Result<InstrumentAnalysis> {
        let (series, frame) = self.prepare(points)?;
        let signals = self.classifier.classify(series.points(), &frame);
        let forecast = self.forecaster.forecast(series.points(), &frame);
        let latest = frame.latest().unwrap_or_default();

        debug!(
            bars = series.len(),
            signals = signals.len(),
            forecast = forecast.is_some(),
            "analyzed instrument"
        );

        Ok(InstrumentAnalysis {
            bars: series.len(),
            latest,
            signals,
            forecast,
        })
    }
}
