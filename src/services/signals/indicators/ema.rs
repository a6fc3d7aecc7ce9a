//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::indicators::PriceField;
use crate::services::signals::Indicator;
use crate::types::{PricePoint, Series};

/// EMA (Exponential Moving Average) indicator.
///
/// Recursive average with smoothing factor `2 / (span + 1)`, seeded by the
/// first defined value and without warm-up bias correction, so it is
/// defined from the first bar.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    /// EMA over an arbitrary series.
    ///
    /// An undefined input produces an undefined output at that position and
    /// leaves the running average untouched.
    pub fn series(values: &[Option<f64>], span: usize) -> Series {
        let alpha = 2.0 / (span as f64 + 1.0);
        let mut state: Option<f64> = None;

        values
            .iter()
            .map(|value| {
                let x = (*value)?;
                let next = match state {
                    Some(prev) => (1.0 - alpha) * prev + alpha * x,
                    None => x,
                };
                state = Some(next);
                state
            })
            .collect()
    }
}

impl Indicator for Ema {
    fn id(&self) -> &str {
        match self.span {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        Self::series(&PriceField::Close.values(points), self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_by_first_value() {
        let out = Ema::series(&[Some(10.0), Some(10.0)], 9);
        assert_eq!(out, vec![Some(10.0), Some(10.0)]);
    }

    #[test]
    fn test_ema_recursion() {
        // span 3 => alpha 0.5
        let out = Ema::series(&[Some(2.0), Some(4.0), Some(8.0)], 3);
        assert_eq!(out, vec![Some(2.0), Some(3.0), Some(5.5)]);
    }

    #[test]
    fn test_ema_skips_undefined() {
        let out = Ema::series(&[None, Some(2.0), None, Some(4.0)], 3);
        assert_eq!(out, vec![None, Some(2.0), None, Some(3.0)]);
    }

    #[test]
    fn test_ema_indicator_over_closes() {
        let points: Vec<PricePoint> = (0..3)
            .map(|i| PricePoint::new(i, 2.0 * (i + 1) as f64, 1.0))
            .collect();
        let ema = Ema::new(3);
        assert_eq!(ema.id(), "ema");
        assert_eq!(ema.calculate(&points), vec![Some(2.0), Some(3.0), Some(4.5)]);
        assert_eq!(Ema::new(12).id(), "ema12");
    }
}
