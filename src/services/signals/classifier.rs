//! Bar-by-bar buy/sell signal classification.
//!
//! Rules are evaluated in priority order and the first match wins. A rule
//! never matches when any value it reads is undefined.

use crate::config::IndicatorConfig;
use crate::services::signals::round_to;
use crate::types::{defined, IndicatorFrame, PricePoint, Signal, SignalReason};
use tracing::debug;

/// Volume multiple of its short average that confirms a breakout.
const BREAKOUT_VOLUME_MULTIPLE: f64 = 1.2;
/// Volume multiple of its short average below which volume counts as fading.
const FADING_VOLUME_MULTIPLE: f64 = 0.8;
/// Extension above the short MA that makes a rally overextended.
const OVEREXTENSION_MULTIPLE: f64 = 1.03;

/// Inputs the rules read for one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarContext {
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_short_prev: Option<f64>,
    pub ma_long: Option<f64>,
    pub ma_long_prev: Option<f64>,
    pub volume_ma: Option<f64>,
    pub histogram: Option<f64>,
    pub momentum: Option<f64>,
    pub volume_change: Option<f64>,
}

impl BarContext {
    /// Gather the rule inputs for bar `index` (which must be at least 1).
    pub fn at(points: &[PricePoint], frame: &IndicatorFrame, index: usize) -> Self {
        let current = frame.at(index);
        let previous = frame.at(index - 1);
        let point = points.get(index);

        Self {
            price: point.and_then(|p| defined(p.close)),
            volume: point.and_then(|p| defined(p.volume)),
            ma_short: current.ma_short,
            ma_short_prev: previous.ma_short,
            ma_long: current.ma_long,
            ma_long_prev: previous.ma_long,
            volume_ma: current.volume_ma_short,
            histogram: current.histogram,
            momentum: current.momentum,
            volume_change: current.volume_change,
        }
    }

    /// Short-MA change versus the previous bar.
    pub fn short_trend(&self) -> Option<f64> {
        Some(self.ma_short? - self.ma_short_prev?)
    }
}

/// A predicate-guarded signal constructor.
struct Rule {
    reason: SignalReason,
    matches: fn(&BarContext) -> Option<bool>,
}

/// Classification rules in priority order.
const RULES: [Rule; 4] = [
    Rule {
        reason: SignalReason::BreakoutBuy,
        matches: breakout_buy,
    },
    Rule {
        reason: SignalReason::PullbackBuy,
        matches: pullback_buy,
    },
    Rule {
        reason: SignalReason::ReversalSell,
        matches: reversal_sell,
    },
    Rule {
        reason: SignalReason::TakeProfitSell,
        matches: take_profit_sell,
    },
];

// Golden cross on this bar, MACD positive, volume expanding.
fn breakout_buy(bar: &BarContext) -> Option<bool> {
    Some(
        bar.short_trend()? > 0.0
            && bar.ma_short? > bar.ma_long?
            && bar.ma_short_prev? <= bar.ma_long_prev?
            && bar.histogram? > 0.0
            && bar.volume? > bar.volume_ma? * BREAKOUT_VOLUME_MULTIPLE,
    )
}

// Established uptrend, price dipped under the short MA, momentum and volume turning up.
fn pullback_buy(bar: &BarContext) -> Option<bool> {
    Some(
        bar.short_trend()? > 0.0
            && bar.ma_short? > bar.ma_long?
            && bar.price? < bar.ma_short?
            && bar.momentum? > 0.0
            && bar.volume_change? > 0.0,
    )
}

// Death cross on this bar with MACD negative.
fn reversal_sell(bar: &BarContext) -> Option<bool> {
    Some(
        bar.short_trend()? < 0.0
            && bar.ma_short? < bar.ma_long?
            && bar.ma_short_prev? >= bar.ma_long_prev?
            && bar.histogram? < 0.0,
    )
}

// Still rising but momentum gone, volume drying up and price stretched above the short MA.
fn take_profit_sell(bar: &BarContext) -> Option<bool> {
    Some(
        bar.short_trend()? > 0.0
            && bar.momentum? < 0.0
            && bar.volume? < bar.volume_ma? * FADING_VOLUME_MULTIPLE
            && bar.price? > bar.ma_short? * OVEREXTENSION_MULTIPLE,
    )
}

/// The first rule matching this bar, if any.
pub fn classify_bar(bar: &BarContext) -> Option<SignalReason> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(bar) == Some(true))
        .map(|rule| rule.reason)
}

/// Walks an indicator frame and emits signals in time order.
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    start_index: usize,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

impl SignalClassifier {
    /// Evaluation starts at the first bar whose long-MA predecessor is populated.
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            start_index: config.ma_long_window.max(1),
        }
    }

    /// Classify every eligible bar.
    pub fn classify(&self, points: &[PricePoint], frame: &IndicatorFrame) -> Vec<Signal> {
        let bars = points.len().min(frame.len());
        let mut signals = Vec::new();
        let mut previous_price: Option<f64> = None;

        for i in self.start_index..bars {
            let bar = BarContext::at(points, frame, i);
            let Some(reason) = classify_bar(&bar) else {
                continue;
            };

            let price = points[i].close;
            let price_change = previous_price
                .filter(|prev| *prev != 0.0)
                .map(|prev| round_to((price - prev) / prev, 6));
            previous_price = Some(price);

            debug!(
                time = points[i].time,
                direction = reason.direction().label(),
                strength = reason.strength().label(),
                "{} signal",
                reason.label()
            );

            signals.push(Signal {
                time: points[i].time,
                price: round_to(price, 6),
                direction: reason.direction(),
                reason,
                strength: reason.strength(),
                price_change,
            });
        }

        debug!(
            bars,
            signals = signals.len(),
            "classified bars from index {}",
            self.start_index
        );

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::IndicatorEngine;
    use crate::types::{SignalDirection, SignalStrength};

    fn create_points(closes: &[f64], volumes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .zip(volumes.iter())
            .enumerate()
            .map(|(i, (&c, &v))| PricePoint::new(1_000_000 + i as i64 * 60_000, c, v))
            .collect()
    }

    fn classify(points: &[PricePoint]) -> Vec<Signal> {
        let frame = IndicatorEngine::default().compute(points);
        SignalClassifier::default().classify(points, &frame)
    }

    fn bullish_bar() -> BarContext {
        BarContext {
            price: Some(101.0),
            volume: Some(2000.0),
            ma_short: Some(101.0),
            ma_short_prev: Some(100.0),
            ma_long: Some(100.5),
            ma_long_prev: Some(100.0),
            volume_ma: Some(1100.0),
            histogram: Some(0.2),
            momentum: Some(1.0),
            volume_change: Some(0.5),
        }
    }

    #[test]
    fn test_breakout_rule_in_isolation() {
        assert_eq!(breakout_buy(&bullish_bar()), Some(true));

        let weak_volume = BarContext {
            volume: Some(1200.0),
            ..bullish_bar()
        };
        assert_eq!(breakout_buy(&weak_volume), Some(false));
    }

    #[test]
    fn test_pullback_rule_in_isolation() {
        let bar = BarContext {
            price: Some(100.8),
            ma_short_prev: Some(100.9),
            ma_long_prev: Some(100.4),
            ..bullish_bar()
        };
        assert_eq!(pullback_buy(&bar), Some(true));
        assert_eq!(classify_bar(&bar), Some(SignalReason::PullbackBuy));
    }

    #[test]
    fn test_reversal_rule_in_isolation() {
        let bar = BarContext {
            ma_short: Some(99.0),
            ma_short_prev: Some(100.0),
            ma_long: Some(99.5),
            ma_long_prev: Some(100.0),
            histogram: Some(-0.1),
            ..BarContext::default()
        };
        assert_eq!(reversal_sell(&bar), Some(true));
        assert_eq!(classify_bar(&bar), Some(SignalReason::ReversalSell));
    }

    #[test]
    fn test_take_profit_rule_in_isolation() {
        let bar = BarContext {
            price: Some(110.0),
            volume: Some(500.0),
            ma_short: Some(105.0),
            ma_short_prev: Some(104.0),
            volume_ma: Some(1000.0),
            momentum: Some(-2.0),
            ..BarContext::default()
        };
        assert_eq!(take_profit_sell(&bar), Some(true));
        assert_eq!(classify_bar(&bar), Some(SignalReason::TakeProfitSell));
    }

    #[test]
    fn test_undefined_input_never_matches() {
        let bar = BarContext {
            histogram: None,
            ..bullish_bar()
        };
        assert_eq!(breakout_buy(&bar), None);
        assert_eq!(classify_bar(&bar), None);
    }

    #[test]
    fn test_priority_breakout_before_pullback() {
        // Satisfies both breakout and pullback; breakout must win.
        let bar = BarContext {
            price: Some(100.9),
            ..bullish_bar()
        };
        assert_eq!(pullback_buy(&bar), Some(true));
        assert_eq!(classify_bar(&bar), Some(SignalReason::BreakoutBuy));
    }

    #[test]
    fn test_short_series_yields_nothing() {
        for len in [0, 1, 10, 29, 30] {
            let closes: Vec<f64> = (0..len).map(|i| 100.0 + (i % 7) as f64).collect();
            let volumes = vec![1000.0; len];
            assert!(classify(&create_points(&closes, &volumes)).is_empty());
        }
    }

    #[test]
    fn test_golden_cross_breakout_at_bar_35() {
        let mut closes = vec![100.0; 40];
        closes[35..].iter_mut().for_each(|c| *c = 110.0);
        let mut volumes = vec![1000.0; 40];
        volumes[35] = 2000.0;

        let signals = classify(&create_points(&closes, &volumes));
        assert_eq!(signals.len(), 1);

        let signal = &signals[0];
        assert_eq!(signal.time, 1_000_000 + 35 * 60_000);
        assert_eq!(signal.reason, SignalReason::BreakoutBuy);
        assert_eq!(signal.direction, SignalDirection::Buy);
        assert_eq!(signal.strength, SignalStrength::Strong);
        assert_eq!(signal.price, 110.0);
        assert_eq!(signal.price_change, None);
    }

    #[test]
    fn test_death_cross_reversal_at_bar_35() {
        let mut closes = vec![100.0; 40];
        closes[35..].iter_mut().for_each(|c| *c = 90.0);
        let volumes = vec![1000.0; 40];

        let signals = classify(&create_points(&closes, &volumes));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, SignalReason::ReversalSell);
        assert_eq!(signals[0].strength, SignalStrength::Strong);
        assert_eq!(signals[0].time, 1_000_000 + 35 * 60_000);
    }

    #[test]
    fn test_pullback_in_uptrend() {
        let mut closes: Vec<f64> = (0..39).map(|i| 100.0 + i as f64).collect();
        closes[37] = 150.0;
        closes[38] = 134.0;
        let volumes: Vec<f64> = (0..39).map(|i| 1000.0 + i as f64 * 10.0).collect();

        let signals = classify(&create_points(&closes, &volumes));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, SignalReason::PullbackBuy);
        assert_eq!(signals[0].strength, SignalStrength::Medium);
        assert_eq!(signals[0].price, 134.0);
    }

    #[test]
    fn test_pullback_blocked_after_zero_volume_bar() {
        let mut closes: Vec<f64> = (0..39).map(|i| 100.0 + i as f64).collect();
        closes[37] = 150.0;
        closes[38] = 134.0;
        let mut volumes: Vec<f64> = (0..39).map(|i| 1000.0 + i as f64 * 10.0).collect();
        volumes[37] = 0.0;

        let points = create_points(&closes, &volumes);
        let frame = IndicatorEngine::default().compute(&points);
        let bar = BarContext::at(&points, &frame, 38);
        assert_eq!(bar.volume_change, None);
        assert_eq!(pullback_buy(&bar), None);
        assert!(classify(&points).is_empty());
    }

    #[test]
    fn test_take_profit_after_spike() {
        let mut closes = vec![100.0; 40];
        closes[34] = 200.0;
        closes[39] = 150.0;
        let mut volumes = vec![1000.0; 40];
        volumes[39] = 500.0;

        let signals = classify(&create_points(&closes, &volumes));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, SignalReason::TakeProfitSell);
        assert_eq!(signals[0].direction, SignalDirection::Sell);
        assert_eq!(signals[0].time, 1_000_000 + 39 * 60_000);
    }

    #[test]
    fn test_price_change_between_signals() {
        // Golden cross at 35, then a death cross at 45.
        let mut closes = vec![100.0; 60];
        closes[35..45].iter_mut().for_each(|c| *c = 110.0);
        closes[45..].iter_mut().for_each(|c| *c = 80.0);
        let mut volumes = vec![1000.0; 60];
        volumes[35] = 2000.0;

        let signals = classify(&create_points(&closes, &volumes));
        let breakout = signals
            .iter()
            .position(|s| s.reason == SignalReason::BreakoutBuy)
            .unwrap();
        assert_eq!(breakout, 0);
        assert_eq!(signals[0].price_change, None);

        for pair in signals.windows(2) {
            let expected = round_to((pair[1].price - pair[0].price) / pair[0].price, 6);
            assert_eq!(pair[1].price_change, Some(expected));
        }
        assert!(signals.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_breakout_and_reversal_exclusive() {
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + ((i as f64) * 0.35).sin() * 8.0 + (i % 3) as f64)
            .collect();
        let volumes: Vec<f64> = (0..120).map(|i| 1000.0 + ((i * 37) % 11) as f64 * 150.0).collect();
        let points = create_points(&closes, &volumes);
        let frame = IndicatorEngine::default().compute(&points);

        for i in 30..points.len() {
            let bar = BarContext::at(&points, &frame, i);
            let both = breakout_buy(&bar) == Some(true) && reversal_sell(&bar) == Some(true);
            assert!(!both, "bar {} matched both crosses", i);
        }
    }

    #[test]
    fn test_nan_close_blocks_signal() {
        let mut closes = vec![100.0; 40];
        closes[35..].iter_mut().for_each(|c| *c = 110.0);
        closes[35] = f64::NAN;
        let mut volumes = vec![1000.0; 40];
        volumes[35] = 2000.0;

        let signals = classify(&create_points(&closes, &volumes));
        assert!(signals.iter().all(|s| s.time != 1_000_000 + 35 * 60_000));
    }

    #[test]
    fn test_classification_idempotent() {
        let closes: Vec<f64> = (0..80).map(|i| 50.0 + ((i as f64) * 0.5).cos() * 3.0).collect();
        let volumes: Vec<f64> = (0..80).map(|i| 500.0 + (i % 5) as f64 * 100.0).collect();
        let points = create_points(&closes, &volumes);

        let first = classify(&points);
        let second = classify(&points);
        assert_eq!(first, second);
    }
}
