//! Support/resistance level forecasting at the latest bar.

use crate::config::IndicatorConfig;
use crate::services::signals::round_to;
use crate::types::{
    defined, IndicatorFrame, LevelForecast, PriceLevelPrediction, PricePoint, SignalDirection,
};
use tracing::debug;

/// Number of extreme closes considered on each side.
const EXTREME_CLOSES: usize = 5;
/// Number of levels kept on each side.
const LEVELS_PER_SIDE: usize = 3;
/// Relative distance under which a level counts as sitting on a moving average.
const MA_PROXIMITY: f64 = 0.01;

const MIN_BASE_CONFIDENCE: f64 = 0.3;
const MAX_BASE_CONFIDENCE: f64 = 0.9;
const MAX_CONFIDENCE: f64 = 0.95;

const SHORT_MA_BOOST: f64 = 0.10;
const LONG_MA_BOOST: f64 = 0.15;
const MACD_BOOST: f64 = 0.10;

/// Accumulates confidence boosts and reasons for one candidate level.
#[derive(Debug, Clone)]
struct LevelBuilder {
    level_type: SignalDirection,
    price: f64,
    confidence: f64,
    reasons: Vec<String>,
}

impl LevelBuilder {
    fn new(level_type: SignalDirection, price: f64, current_price: f64) -> Self {
        let proximity = 1.0 - (price - current_price).abs() / current_price;
        Self {
            level_type,
            price,
            confidence: proximity.clamp(MIN_BASE_CONFIDENCE, MAX_BASE_CONFIDENCE),
            reasons: Vec::new(),
        }
    }

    fn boost(mut self, applies: bool, amount: f64, reason: impl Into<String>) -> Self {
        if applies {
            self.confidence += amount;
            self.reasons.push(reason.into());
        }
        self
    }

    fn build(self, expected_move_pct: f64) -> PriceLevelPrediction {
        let reasons = if self.reasons.is_empty() {
            vec![match self.level_type {
                SignalDirection::Buy => "near historical support level".to_string(),
                SignalDirection::Sell => "near historical resistance level".to_string(),
            }]
        } else {
            self.reasons
        };

        PriceLevelPrediction {
            level_type: self.level_type,
            price: round_to(self.price, 2),
            confidence: round_to(self.confidence.min(MAX_CONFIDENCE), 2),
            reasons,
            expected_move_pct,
        }
    }
}

/// Latest-bar inputs the forecaster needs; all must be defined.
#[derive(Debug, Clone, Copy)]
struct LatestBar {
    price: f64,
    ma_short: f64,
    ma_long: f64,
    histogram: f64,
    rolling_std: f64,
}

/// Derives candidate support and resistance levels.
#[derive(Debug, Clone)]
pub struct LevelForecaster {
    short_window: usize,
    long_window: usize,
}

impl Default for LevelForecaster {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

impl LevelForecaster {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            short_window: config.ma_short_window,
            long_window: config.ma_long_window,
        }
    }

    /// Forecast levels around the latest bar.
    ///
    /// Returns `None` when the latest price or any indicator it depends on
    /// is undefined, or the price is not positive.
    pub fn forecast(&self, points: &[PricePoint], frame: &IndicatorFrame) -> Option<LevelForecast> {
        let latest = Self::latest_bar(points, frame)?;
        let price = latest.price;

        let mut closes: Vec<f64> = points.iter().filter_map(|p| defined(p.close)).collect();
        closes.sort_by(f64::total_cmp);

        let averages = [latest.ma_short, latest.ma_long];

        let supports = nearest_levels(
            averages
                .iter()
                .copied()
                .chain(closes.iter().take(EXTREME_CLOSES).copied())
                .filter(|level| *level < price),
        );
        let resistances = nearest_levels(
            averages
                .iter()
                .copied()
                .chain(closes.iter().rev().take(EXTREME_CLOSES).copied())
                .filter(|level| *level > price),
        );

        let expected_move_pct = round_to(latest.rolling_std / price * 100.0 * 2.0, 1);

        let mut predictions: Vec<PriceLevelPrediction> = supports
            .into_iter()
            .map(|level| self.evaluate(SignalDirection::Buy, level, &latest, expected_move_pct))
            .chain(
                resistances
                    .into_iter()
                    .map(|level| self.evaluate(SignalDirection::Sell, level, &latest, expected_move_pct)),
            )
            .collect();

        // Stable sort keeps supports before resistances on equal confidence.
        predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            current_price = price,
            predictions = predictions.len(),
            "forecast price levels"
        );

        Some(LevelForecast {
            current_price: price,
            predictions,
        })
    }

    fn latest_bar(points: &[PricePoint], frame: &IndicatorFrame) -> Option<LatestBar> {
        let index = points.len().checked_sub(1)?;
        if frame.len() != points.len() {
            return None;
        }

        let price = defined(points[index].close).filter(|p| *p > 0.0)?;
        let snapshot = frame.at(index);

        Some(LatestBar {
            price,
            ma_short: snapshot.ma_short?,
            ma_long: snapshot.ma_long?,
            histogram: snapshot.histogram?,
            rolling_std: snapshot.rolling_std?,
        })
    }

    fn evaluate(
        &self,
        level_type: SignalDirection,
        level: f64,
        latest: &LatestBar,
        expected_move_pct: f64,
    ) -> PriceLevelPrediction {
        let price = latest.price;
        let (side, macd_agrees, macd_reason) = match level_type {
            SignalDirection::Buy => ("support", latest.histogram > 0.0, "MACD trending up"),
            SignalDirection::Sell => ("resistance", latest.histogram < 0.0, "MACD weakening"),
        };

        LevelBuilder::new(level_type, level, price)
            .boost(
                (level - latest.ma_short).abs() / price < MA_PROXIMITY,
                SHORT_MA_BOOST,
                format!("near {}-period MA {}", self.short_window, side),
            )
            .boost(
                (level - latest.ma_long).abs() / price < MA_PROXIMITY,
                LONG_MA_BOOST,
                format!("near {}-period MA {}", self.long_window, side),
            )
            .boost(macd_agrees, MACD_BOOST, macd_reason)
            .build(expected_move_pct)
    }
}

/// Deduplicate, sort ascending and keep the first few levels.
fn nearest_levels(levels: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut levels: Vec<f64> = levels.collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    levels.truncate(LEVELS_PER_SIDE);
    levels
}
