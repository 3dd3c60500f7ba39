use serde::{Deserialize, Serialize};

/// Display color class of a candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleColor {
    /// Computed, close >= open.
    Bullish,
    /// Computed, close < open.
    Bearish,
    /// Not yet computed; neutral gray regardless of direction.
    Pending,
}

impl CandleColor {
    pub fn as_hex(&self) -> &'static str {
        match self {
            Self::Bullish => "#26a69a",
            Self::Bearish => "#ef5350",
            Self::Pending => "#9e9e9e",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for CandleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}
