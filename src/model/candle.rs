use serde::{Deserialize, Serialize};

/// One OHLC bar. `timestamp` is epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bullish bar (a flat bar counts as up).
    #[inline]
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}
