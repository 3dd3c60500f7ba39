use serde::{Deserialize, Serialize};

/// A closed round-trip trade reported by the engine.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trade {
    pub entry_time: i64,
    pub exit_time: i64,
    pub symbol: String,
    pub side: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub commission: f64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trade() {
        let raw = r#"{
            "entryTime": 100, "exitTime": 200, "symbol": "BTC/USD", "side": "long",
            "entryPrice": 50000.0, "exitPrice": 51000.0, "quantity": 0.5,
            "pnl": 500.0, "commission": 2.5, "reason": "take_profit"
        }"#;
        let trade: Trade = serde_json::from_str(raw).unwrap();

        assert_eq!(trade.exit_time, 200);
        assert_eq!(trade.symbol, "BTC/USD");
        assert_eq!(trade.pnl, 500.0);
    }
}
