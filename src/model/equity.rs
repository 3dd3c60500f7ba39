use serde::{Deserialize, Serialize};

/// Point on the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub equity: f64,
    #[serde(default)]
    pub drawdown: f64,
}

impl EquityPoint {
    pub fn new(timestamp: i64, equity: f64, drawdown: f64) -> Self {
        Self {
            timestamp,
            equity,
            drawdown,
        }
    }
}
