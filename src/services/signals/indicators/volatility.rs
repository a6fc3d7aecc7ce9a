//! Volatility and trend-strength indicators.

use crate::services::signals::indicators::{pct_change, rolling_mean, rolling_std, PriceField};
use crate::services::signals::Indicator;
use crate::types::{PricePoint, Series};

/// Rolling sample standard deviation of closes.
pub struct RollingStd {
    period: usize,
}

impl Default for RollingStd {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl RollingStd {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for RollingStd {
    fn id(&self) -> &str {
        match self.period {
            20 => "std20",
            _ => "std",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        rolling_std(&PriceField::Close.values(points), self.period)
    }
}

/// Mean of close-to-close returns divided by their standard deviation.
///
/// A window of perfectly flat returns scores 0.
pub struct TrendStrength {
    period: usize,
}

impl Default for TrendStrength {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl TrendStrength {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for TrendStrength {
    fn id(&self) -> &str {
        "trend_strength"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        let returns = pct_change(&PriceField::Close.values(points));
        let means = rolling_mean(&returns, self.period);
        let stds = rolling_std(&returns, self.period);

        means
            .iter()
            .zip(stds.iter())
            .map(|(mean, std)| {
                let (mean, std) = ((*mean)?, (*std)?);
                Some(if std == 0.0 { 0.0 } else { mean / std })
            })
            .collect()
    }
}
