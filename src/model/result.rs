use serde::{Deserialize, Serialize};

use super::{Candle, EquityPoint, Metrics, Trade, bar_count, null_as_default};

/// Lifecycle of a task as seen by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Completed, failed and cancelled all end the task.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_success() -> bool {
    true
}

/// Final payload carried by the engine's `completed` event.
///
/// Authoritative for metrics and timing; its series may be empty or trimmed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalResult {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub candles: Vec<Candle>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trades: Vec<Trade>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Metrics,
    #[serde(default, deserialize_with = "bar_count")]
    pub processed_bars: u64,
    #[serde(default, deserialize_with = "bar_count")]
    pub total_bars: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_time_ms: u64,
}

impl Default for TerminalResult {
    fn default() -> Self {
        Self {
            success: true,
            error_message: None,
            candles: Vec::new(),
            equity_curve: Vec::new(),
            trades: Vec::new(),
            metrics: Metrics::default(),
            processed_bars: 0,
            total_bars: 0,
            start_time: 0,
            end_time: 0,
            execution_time_ms: 0,
        }
    }
}

/// Everything accumulated for one task; the unit the chart renders from.
///
/// Series only grow while the task is running. Metrics are merged key by key.
/// Once `status` is terminal the value is frozen.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub status: TaskStatus,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub candles: Vec<Candle>,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    pub processed_bars: u64,
    pub total_bars: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub execution_time_ms: u64,
}

impl AggregateResult {
    /// Fresh running result with zeroed timing.
    pub fn new() -> Self {
        Self {
            status: TaskStatus::Running,
            success: true,
            error_message: None,
            candles: Vec::new(),
            equity_curve: Vec::new(),
            trades: Vec::new(),
            metrics: Metrics::default(),
            processed_bars: 0,
            total_bars: 0,
            start_time: 0,
            end_time: 0,
            execution_time_ms: 0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == TaskStatus::Running
    }
}

impl Default for AggregateResult {
    fn default() -> Self {
        Self::new()
    }
}
