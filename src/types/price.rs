use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// A single intraday bar as delivered by the data provider.
///
/// Numeric fields are read leniently: JSON numbers and numeric strings are
/// accepted, anything else becomes NaN and is treated as undefined downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds.
    pub time: i64,
    #[serde(deserialize_with = "lenient_f64")]
    pub close: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: f64,
}

impl PricePoint {
    pub fn new(time: i64, close: f64, volume: f64) -> Self {
        Self { time, close, volume }
    }
}

/// An ingested, chronologically validated price series.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate and wrap a series.
    ///
    /// Fails on an empty series, non-increasing timestamps or negative volume.
    /// NaN closes and volumes are allowed; they mark malformed fields.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(AppError::missing("price series is empty"));
        }

        for pair in points.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(AppError::InvalidSeries(format!(
                    "timestamps must be strictly ascending ({} followed by {})",
                    pair[0].time, pair[1].time
                )));
            }
        }

        if let Some(point) = points.iter().find(|p| p.volume < 0.0) {
            return Err(AppError::InvalidSeries(format!(
                "negative volume {} at {}",
                point.volume, point.time
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Convert a raw value to `Some` only when it is a usable number.
pub fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Parse a provider-formatted number such as `"+1.25%"` or `"12,345.6"`.
/// Unparseable input yields NaN.
pub fn parse_numeric(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | '+' | ',') && !c.is_whitespace())
        .collect();

    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}

/// Read a JSON number or numeric string, mapping anything else to NaN.
pub fn numeric_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric(s),
        _ => f64::NAN,
    }
}

/// Serde adapter for lenient numeric fields.
pub fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric_value(&value))
}
