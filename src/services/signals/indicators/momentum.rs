//! Price momentum indicator.

use crate::services::signals::indicators::PriceField;
use crate::services::signals::Indicator;
use crate::types::{PricePoint, Series};

/// Momentum: `close[i] - close[i - lag]`.
pub struct Momentum {
    lag: usize,
}

impl Default for Momentum {
    fn default() -> Self {
        Self { lag: 5 }
    }
}

impl Momentum {
    pub fn new(lag: usize) -> Self {
        Self { lag }
    }
}

impl Indicator for Momentum {
    fn id(&self) -> &str {
        "momentum"
    }

    fn min_periods(&self) -> usize {
        self.lag + 1
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        let closes = PriceField::Close.values(points);
        (0..closes.len())
            .map(|i| {
                let past = closes[i.checked_sub(self.lag)?]?;
                Some(closes[i]? - past)
            })
            .collect()
    }
}
