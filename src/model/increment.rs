use serde::{Deserialize, Serialize};

use super::{Candle, EquityPoint, Metrics, Trade, bar_count, null_as_default};

/// One slice of newly computed work emitted while a task is running.
///
/// Series fields are appended downstream, never substituted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawIncrement {
    #[serde(deserialize_with = "null_as_default")]
    pub new_candles: Vec<Candle>,
    #[serde(deserialize_with = "null_as_default")]
    pub new_equity_points: Vec<EquityPoint>,
    #[serde(deserialize_with = "null_as_default")]
    pub new_trades: Vec<Trade>,
    #[serde(deserialize_with = "null_as_default")]
    pub current_metrics: Metrics,
    #[serde(deserialize_with = "bar_count")]
    pub processed_bars: u64,
    #[serde(deserialize_with = "bar_count")]
    pub total_bars: u64,
}

impl RawIncrement {
    /// True when the increment carries no series data.
    pub fn is_empty(&self) -> bool {
        self.new_candles.is_empty()
            && self.new_equity_points.is_empty()
            && self.new_trades.is_empty()
    }
}
