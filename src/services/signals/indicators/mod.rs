//! Technical indicator implementations.
//!
//! Each indicator produces a series aligned with its input: one entry per
//! bar, `None` until the indicator's window is populated or wherever an
//! input it depends on is undefined.

pub mod ema;
pub mod macd;
pub mod momentum;
pub mod sma;
pub mod volatility;
pub mod volume;

pub use ema::Ema;
pub use macd::{Macd, MacdLines};
pub use momentum::Momentum;
pub use sma::Sma;
pub use volatility::{RollingStd, TrendStrength};
pub use volume::{VolumeChange, VolumeRatio};

use crate::config::IndicatorConfig;
use crate::types::{defined, IndicatorFrame, PricePoint, Series};
use tracing::debug;

use super::Indicator;

/// Which field of a bar an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    Volume,
}

impl PriceField {
    /// Extract this field from every bar, NaN mapped to `None`.
    pub fn values(&self, points: &[PricePoint]) -> Series {
        points
            .iter()
            .map(|p| match self {
                PriceField::Close => defined(p.close),
                PriceField::Volume => defined(p.volume),
            })
            .collect()
    }
}

/// Trailing mean over `window` entries. Undefined until the window is full
/// and wherever the window contains an undefined entry.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Series {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        out[i] = values[i + 1 - window..=i]
            .iter()
            .copied()
            .sum::<Option<f64>>()
            .map(|sum| sum / window as f64);
    }

    out
}

/// Trailing sample standard deviation (n - 1 denominator).
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Series {
    let mut out = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let slice: Option<Vec<f64>> = values[i + 1 - window..=i].iter().copied().collect();
        out[i] = slice.map(|w| sample_std(&w));
    }

    out
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Fractional change versus the previous entry. Undefined on the first
/// entry and when the previous value is zero or undefined.
pub fn pct_change(values: &[Option<f64>]) -> Series {
    let mut out = vec![None; values.len()];
    for i in 1..values.len() {
        out[i] = match (values[i - 1], values[i]) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev),
            _ => None,
        };
    }
    out
}

/// Derives a full [`IndicatorFrame`] from a price series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// Compute every indicator series for the given bars.
    pub fn compute(&self, points: &[PricePoint]) -> IndicatorFrame {
        let c = &self.config;
        let ma_short = Sma::close(c.ma_short_window);
        let ma_long = Sma::close(c.ma_long_window);
        let volume_ma = Sma::volume(c.volume_ma_window);
        let volume_ratio = VolumeRatio::new(c.volume_ma_window);
        let macd = Macd::new(c.macd_fast, c.macd_slow, c.macd_signal);
        let momentum = Momentum::new(c.momentum_lag);
        let rolling_std = RollingStd::new(c.volatility_window);
        let trend_strength = TrendStrength::new(c.volatility_window);

        let indicators: [&dyn Indicator; 9] = [
            &ma_short,
            &ma_long,
            &volume_ma,
            &volume_ratio,
            &macd,
            &momentum,
            &VolumeChange,
            &rolling_std,
            &trend_strength,
        ];
        let pending = warming_up(&indicators, points.len());
        debug!(bars = points.len(), ?pending, "computing indicator frame");

        let lines = macd.lines(points);

        IndicatorFrame {
            ma_short: ma_short.calculate(points),
            ma_long: ma_long.calculate(points),
            volume_ma_short: volume_ma.calculate(points),
            volume_ratio: volume_ratio.calculate(points),
            macd: lines.macd,
            signal_line: lines.signal,
            histogram: lines.histogram,
            momentum: momentum.calculate(points),
            volume_change: VolumeChange.calculate(points),
            rolling_std: rolling_std.calculate(points),
            trend_strength: trend_strength.calculate(points),
        }
    }
}

/// Ids of the indicators that cannot produce a value from `bars` bars.
pub fn warming_up(indicators: &[&dyn Indicator], bars: usize) -> Vec<String> {
    indicators
        .iter()
        .filter(|indicator| indicator.min_periods() > bars)
        .map(|indicator| indicator.id().to_string())
        .collect()
}
