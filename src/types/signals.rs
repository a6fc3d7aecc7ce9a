use serde::{Deserialize, Serialize};

/// An indicator series aligned with its price series. `None` marks bars
/// where the indicator is not yet (or not validly) available.
pub type Series = Vec<Option<f64>>;

/// Direction of a trading signal or price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "Buy",
            SignalDirection::Sell => "Sell",
        }
    }
}

/// Strength label attached to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    Strong,
    Medium,
}

impl SignalStrength {
    pub fn label(&self) -> &'static str {
        match self {
            SignalStrength::Strong => "Strong",
            SignalStrength::Medium => "Medium",
        }
    }
}

/// The rule that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalReason {
    /// Golden cross confirmed by MACD and expanding volume.
    BreakoutBuy,
    /// Dip below the short MA inside an established uptrend.
    PullbackBuy,
    /// Death cross confirmed by MACD.
    ReversalSell,
    /// Overextended rally on fading momentum and volume.
    TakeProfitSell,
}

impl SignalReason {
    /// Get display label for this reason.
    pub fn label(&self) -> &'static str {
        match self {
            SignalReason::BreakoutBuy => "Breakout Buy",
            SignalReason::PullbackBuy => "Pullback Buy",
            SignalReason::ReversalSell => "Reversal Sell",
            SignalReason::TakeProfitSell => "Take-Profit Sell",
        }
    }

    pub fn direction(&self) -> SignalDirection {
        match self {
            SignalReason::BreakoutBuy | SignalReason::PullbackBuy => SignalDirection::Buy,
            SignalReason::ReversalSell | SignalReason::TakeProfitSell => SignalDirection::Sell,
        }
    }

    pub fn strength(&self) -> SignalStrength {
        match self {
            SignalReason::BreakoutBuy | SignalReason::ReversalSell => SignalStrength::Strong,
            SignalReason::PullbackBuy | SignalReason::TakeProfitSell => SignalStrength::Medium,
        }
    }
}

/// A discrete buy/sell event detected on one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Bar timestamp (unix milliseconds).
    pub time: i64,
    /// Close price of the bar, rounded to 6 decimals.
    pub price: f64,
    pub direction: SignalDirection,
    pub reason: SignalReason,
    pub strength: SignalStrength,
    /// Fractional price change versus the previously emitted signal
    /// (0.01 = 1%), rounded to 6 decimals. Absent on the first signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
}

/// Indicator series computed from one price series.
///
/// Every series has exactly the length of the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorFrame {
    pub ma_short: Series,
    pub ma_long: Series,
    pub volume_ma_short: Series,
    pub volume_ratio: Series,
    pub macd: Series,
    pub signal_line: Series,
    pub histogram: Series,
    pub momentum: Series,
    pub volume_change: Series,
    pub rolling_std: Series,
    pub trend_strength: Series,
}

impl IndicatorFrame {
    /// Number of bars covered.
    pub fn len(&self) -> usize {
        self.ma_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ma_short.is_empty()
    }

    /// Indicator values at a single bar.
    pub fn at(&self, index: usize) -> IndicatorSnapshot {
        let get = |series: &Series| series.get(index).copied().flatten();
        IndicatorSnapshot {
            ma_short: get(&self.ma_short),
            ma_long: get(&self.ma_long),
            volume_ma_short: get(&self.volume_ma_short),
            volume_ratio: get(&self.volume_ratio),
            macd: get(&self.macd),
            signal_line: get(&self.signal_line),
            histogram: get(&self.histogram),
            momentum: get(&self.momentum),
            volume_change: get(&self.volume_change),
            rolling_std: get(&self.rolling_std),
            trend_strength: get(&self.trend_strength),
        }
    }

    /// Indicator values at the latest bar, if any.
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).map(|i| self.at(i))
    }
}

/// Indicator values for one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub volume_ma_short: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub histogram: Option<f64>,
    pub momentum: Option<f64>,
    pub volume_change: Option<f64>,
    pub rolling_std: Option<f64>,
    pub trend_strength: Option<f64>,
}

/// A forecast support (buy) or resistance (sell) level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevelPrediction {
    #[serde(rename = "type")]
    pub level_type: SignalDirection,
    /// Level price, rounded to 2 decimals.
    pub price: f64,
    /// Confidence in [0.3, 0.95], rounded to 2 decimals.
    pub confidence: f64,
    pub reasons: Vec<String>,
    /// Expected bounce (buy) or drop (sell) in percent, rounded to 1 decimal.
    pub expected_move_pct: f64,
}

/// Level predictions for an instrument at its latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelForecast {
    pub current_price: f64,
    pub predictions: Vec<PriceLevelPrediction>,
}

/// Full single-instrument analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentAnalysis {
    /// Number of bars analyzed.
    pub bars: usize,
    pub latest: IndicatorSnapshot,
    pub signals: Vec<Signal>,
    /// `None` when the latest bar lacks the inputs a forecast needs.
    pub forecast: Option<LevelForecast>,
}
