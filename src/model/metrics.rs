use serde::{Deserialize, Serialize};

/// Scalar performance aggregates.
///
/// Every field is optional: a partial snapshot from a running task may only
/// report some of them. See [`Metrics::merged_with`] for how snapshots combine
/// in the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pnl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_return: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_drawdown: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_trades: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_trades: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub losing_trades: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_factor: Option<f64>,
}

impl Metrics {
    /// Key-by-key merge: a field reported by `newer` wins, a field it left
    /// out keeps the value from `self`.
    ///
    /// This is the aggregator's policy. The coalescer does NOT use it; within
    /// one flush window the last snapshot replaces the others wholesale.
    pub fn merged_with(&self, newer: &Metrics) -> Metrics {
        Metrics {
            total_pnl: newer.total_pnl.or(self.total_pnl),
            total_return: newer.total_return.or(self.total_return),
            sharpe_ratio: newer.sharpe_ratio.or(self.sharpe_ratio),
            max_drawdown: newer.max_drawdown.or(self.max_drawdown),
            total_trades: newer.total_trades.or(self.total_trades),
            winning_trades: newer.winning_trades.or(self.winning_trades),
            losing_trades: newer.losing_trades.or(self.losing_trades),
            win_rate: newer.win_rate.or(self.win_rate),
            profit_factor: newer.profit_factor.or(self.profit_factor),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Metrics::default()
    }
}
