//! Stream configuration with tunable defaults.

use std::time::Duration;

use crate::downsample::{DEFAULT_MAX_POINTS, EQUITY_MAGNITUDE_LIMIT};
use crate::error::StreamError;

/// Configuration shared by sessions and render passes.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Delay between the first buffered increment and its flush (default: 100ms)
    pub flush_interval_ms: u64,
    /// Point budget per rendered series (default: 2000)
    pub max_points: usize,
    /// Equity values at or beyond this magnitude are dropped (default: 1e15)
    pub equity_magnitude_limit: f64,
    /// Capacity of each session's event channel (default: 256)
    pub event_channel_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: 100,
            max_points: DEFAULT_MAX_POINTS,
            equity_magnitude_limit: EQUITY_MAGNITUDE_LIMIT,
            event_channel_capacity: 256,
        }
    }
}

impl StreamConfig {
    /// Create a new config builder.
    pub fn builder() -> StreamConfigBuilder {
        StreamConfigBuilder::default()
    }

    /// Faster redraws with a smaller budget, for small embedded charts.
    pub fn low_latency() -> Self {
        Self {
            flush_interval_ms: 50,
            max_points: 1000,
            ..Default::default()
        }
    }

    /// Fewer, richer redraws for large full-screen charts.
    pub fn smooth() -> Self {
        Self {
            flush_interval_ms: 250,
            max_points: 4000,
            ..Default::default()
        }
    }

    /// Defaults overridden by `BACKTEST_STREAM_FLUSH_MS`,
    /// `BACKTEST_STREAM_MAX_POINTS` and `BACKTEST_STREAM_CHANNEL_CAPACITY`.
    pub fn from_env() -> Result<Self, StreamError> {
        let mut config = Self::default();

        if let Some(value) = env_parse::<u64>("BACKTEST_STREAM_FLUSH_MS")? {
            config.flush_interval_ms = value;
        }
        if let Some(value) = env_parse::<usize>("BACKTEST_STREAM_MAX_POINTS")? {
            config.max_points = value;
        }
        if let Some(value) = env_parse::<usize>("BACKTEST_STREAM_CHANNEL_CAPACITY")? {
            config.event_channel_capacity = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.max_points < 2 {
            return Err(StreamError::ConfigError(format!(
                "max_points must be at least 2, got {}",
                self.max_points
            )));
        }
        if self.flush_interval_ms == 0 {
            return Err(StreamError::ConfigError(
                "flush_interval_ms must be positive".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(StreamError::ConfigError(
                "event_channel_capacity must be positive".to_string(),
            ));
        }
        if self.equity_magnitude_limit.is_nan() || self.equity_magnitude_limit <= 0.0 {
            return Err(StreamError::ConfigError(
                "equity_magnitude_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, StreamError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                StreamError::ConfigError(format!("{} is not a valid number: {:?}", key, raw))
            }),
        Err(_) => Ok(None),
    }
}

/// Builder pattern for StreamConfig.
#[derive(Default)]
pub struct StreamConfigBuilder {
    config: StreamConfig,
}

impl StreamConfigBuilder {
    /// Set the flush interval in milliseconds.
    pub fn flush_interval_ms(mut self, interval: u64) -> Self {
        self.config.flush_interval_ms = interval;
        self
    }

    /// Set the per-series point budget.
    pub fn max_points(mut self, max_points: usize) -> Self {
        self.config.max_points = max_points;
        self
    }

    /// Set the equity magnitude cutoff.
    pub fn equity_magnitude_limit(mut self, limit: f64) -> Self {
        self.config.equity_magnitude_limit = limit;
        self
    }

    /// Set the per-session event channel capacity.
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.event_channel_capacity = capacity;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StreamConfig {
        self.config
    }
}
