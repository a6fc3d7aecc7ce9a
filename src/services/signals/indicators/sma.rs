//! Simple Moving Average (SMA) indicator.

use crate::services::signals::indicators::{rolling_mean, PriceField};
use crate::services::signals::Indicator;
use crate::types::{PricePoint, Series};

/// SMA (Simple Moving Average) indicator.
///
/// Mean of the trailing `period` values of either closes or volumes.
/// Undefined for the first `period - 1` bars.
pub struct Sma {
    id: String,
    period: usize,
    field: PriceField,
}

impl Sma {
    /// SMA over closing prices.
    pub fn close(period: usize) -> Self {
        Self {
            id: format!("sma{}", period),
            period,
            field: PriceField::Close,
        }
    }

    /// SMA over traded volume.
    pub fn volume(period: usize) -> Self {
        Self {
            id: format!("volume_sma{}", period),
            period,
            field: PriceField::Volume,
        }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        &self.id
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        rolling_mean(&self.field.values(points), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_points(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(1_000_000 + i as i64 * 60_000, c, 100.0 * (i + 1) as f64))
            .collect()
    }

    #[test]
    fn test_sma_ids() {
        assert_eq!(Sma::close(10).id(), "sma10");
        assert_eq!(Sma::volume(10).id(), "volume_sma10");
        assert_eq!(Sma::close(30).min_periods(), 30);
    }

    #[test]
    fn test_sma_close_values() {
        let points = create_points(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let out = Sma::close(5).calculate(&points);
        assert_eq!(out, vec![None, None, None, None, Some(3.0)]);
    }

    #[test]
    fn test_sma_volume_values() {
        let points = create_points(&[1.0, 2.0, 3.0]);
        let out = Sma::volume(2).calculate(&points);
        assert_eq!(out, vec![None, Some(150.0), Some(250.0)]);
    }

    #[test]
    fn test_sma_nan_close_is_undefined() {
        let points = create_points(&[1.0, f64::NAN, 3.0, 4.0]);
        let out = Sma::close(2).calculate(&points);
        assert_eq!(out, vec![None, None, None, Some(3.5)]);
    }
}
