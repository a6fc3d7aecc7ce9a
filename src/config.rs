use std::env;

/// Window lengths used by the indicator engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorConfig {
    /// Short moving average window (default: 10).
    pub ma_short_window: usize,
    /// Long moving average window (default: 30). Also the first bar the
    /// classifier evaluates and the minimum series length for analysis.
    pub ma_long_window: usize,
    /// Volume moving average window (default: 10).
    pub volume_ma_window: usize,
    /// Momentum lag in bars (default: 5).
    pub momentum_lag: usize,
    /// Rolling standard deviation / trend strength window (default: 20).
    pub volatility_window: usize,
    /// MACD fast EMA span (default: 12).
    pub macd_fast: usize,
    /// MACD slow EMA span (default: 26).
    pub macd_slow: usize,
    /// MACD signal line span (default: 9).
    pub macd_signal: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short_window: 10,
            ma_long_window: 30,
            volume_ma_window: 10,
            momentum_lag: 5,
            volatility_window: 20,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl IndicatorConfig {
    /// Minimum number of bars required before any analysis is attempted.
    pub fn min_bars(&self) -> usize {
        self.ma_long_window
    }

    /// Load window overrides from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ma_short_window: env_usize("MA_SHORT_WINDOW", defaults.ma_short_window),
            ma_long_window: env_usize("MA_LONG_WINDOW", defaults.ma_long_window),
            volume_ma_window: env_usize("VOLUME_MA_WINDOW", defaults.volume_ma_window),
            momentum_lag: env_usize("MOMENTUM_LAG", defaults.momentum_lag),
            volatility_window: env_usize("VOLATILITY_WINDOW", defaults.volatility_window),
            macd_fast: env_usize("MACD_FAST", defaults.macd_fast),
            macd_slow: env_usize("MACD_SLOW", defaults.macd_slow),
            macd_signal: env_usize("MACD_SIGNAL", defaults.macd_signal),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Indicator window lengths.
    pub indicators: IndicatorConfig,
    /// Number of sectors returned in each ranking (default: 10).
    pub sector_top_n: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        Self {
            host,
            port,
            indicators: IndicatorConfig::from_env(),
            sector_top_n: env_usize("SECTOR_TOP_N", 10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

// Zero windows are rejected so rolling calculations always have a divisor.
fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &usize| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_config_defaults() {
        let config = IndicatorConfig::default();
        assert_eq!(config.ma_short_window, 10);
        assert_eq!(config.ma_long_window, 30);
        assert_eq!(config.volume_ma_window, 10);
        assert_eq!(config.momentum_lag, 5);
        assert_eq!(config.volatility_window, 20);
        assert_eq!(config.macd_fast, 12);
        assert_eq!(config.macd_slow, 26);
        assert_eq!(config.macd_signal, 9);
    }

    #[test]
    fn test_min_bars_follows_long_window() {
        let config = IndicatorConfig {
            ma_long_window: 60,
            ..IndicatorConfig::default()
        };
        assert_eq!(config.min_bars(), 60);
    }

    #[test]
    fn test_env_usize_fallback() {
        assert_eq!(env_usize("TAPELINE_TEST_UNSET_WINDOW", 7), 7);
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            indicators: IndicatorConfig::default(),
            sector_top_n: 5,
        };

        let cloned = config.clone();
        assert_eq!(cloned.host, config.host);
        assert_eq!(cloned.port, config.port);
        assert_eq!(cloned.indicators, config.indicators);
        assert_eq!(cloned.sector_top_n, 5);
    }
}
