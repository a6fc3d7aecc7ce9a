//! MACD (Moving Average Convergence Divergence) indicator.

use crate::services::signals::indicators::{Ema, PriceField};
use crate::services::signals::Indicator;
use crate::types::{PricePoint, Series};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// Positive histogram = short-term trend strengthening.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

/// The three aligned MACD series.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Compute MACD, signal and histogram series.
    pub fn lines(&self, points: &[PricePoint]) -> MacdLines {
        let closes = PriceField::Close.values(points);
        let fast = Ema::series(&closes, self.fast_period);
        let slow = Ema::series(&closes, self.slow_period);

        let macd: Series = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        let signal = Ema::series(&macd, self.signal_period);

        let histogram = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        self.lines(points).histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_uptrend_points(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| PricePoint::new(1_000_000 + i as i64 * 60_000, 100.0 + i as f64 * 1.5, 1000.0))
            .collect()
    }

    fn create_downtrend_points(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| PricePoint::new(1_000_000 + i as i64 * 60_000, 200.0 - i as f64 * 1.5, 1000.0))
            .collect()
    }

    #[test]
    fn test_macd_id() {
        assert_eq!(Macd::default().id(), "macd");
    }

    #[test]
    fn test_macd_starts_at_zero() {
        let lines = Macd::default().lines(&create_uptrend_points(5));
        assert_eq!(lines.macd[0], Some(0.0));
        assert_eq!(lines.signal[0], Some(0.0));
        assert_eq!(lines.histogram[0], Some(0.0));
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let lines = Macd::default().lines(&create_uptrend_points(50));
        assert!(lines.macd[49].unwrap() > 0.0);
        assert!(lines.histogram[49].unwrap() > 0.0);
    }

    #[test]
    fn test_macd_downtrend_negative() {
        let lines = Macd::default().lines(&create_downtrend_points(50));
        assert!(lines.macd[49].unwrap() < 0.0);
        assert!(lines.histogram[49].unwrap() < 0.0);
    }

    #[test]
    fn test_macd_histogram_identity() {
        let lines = Macd::default().lines(&create_uptrend_points(40));
        for i in 0..40 {
            let expected = lines.macd[i].unwrap() - lines.signal[i].unwrap();
            assert_eq!(lines.histogram[i], Some(expected));
        }
    }

    #[test]
    fn test_macd_calculate_returns_histogram() {
        let points = create_uptrend_points(30);
        let macd = Macd::default();
        assert_eq!(macd.calculate(&points), macd.lines(&points).histogram);
    }
}
