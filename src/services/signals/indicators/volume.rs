//! Volume-derived indicators.

use crate::services::signals::indicators::{pct_change, rolling_mean, PriceField};
use crate::services::signals::Indicator;
use crate::types::{PricePoint, Series};

/// Fractional change of volume versus the previous bar.
///
/// Undefined when the previous bar traded nothing.
pub struct VolumeChange;

impl Indicator for VolumeChange {
    fn id(&self) -> &str {
        "volume_change"
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        pct_change(&PriceField::Volume.values(points))
    }
}

/// Volume relative to its trailing mean.
///
/// Undefined while the mean is warming up or zero.
pub struct VolumeRatio {
    period: usize,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for VolumeRatio {
    fn id(&self) -> &str {
        "volume_ratio"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, points: &[PricePoint]) -> Series {
        let volumes = PriceField::Volume.values(points);
        let means = rolling_mean(&volumes, self.period);

        volumes
            .iter()
            .zip(means.iter())
            .map(|(v, m)| match (*v, *m) {
                (Some(v), Some(m)) if m != 0.0 => Some(v / m),
                _ => None,
            })
            .collect()
    }
}
