//! Data types exchanged with the backtest engine and handed to the chart layer.
//!
//! Field names follow the engine's camelCase JSON. Anything the engine may
//! omit or send as `null` deserializes to its empty/zero value instead of
//! failing the whole message.

pub mod candle;
pub mod equity;
pub mod event;
pub mod increment;
pub mod metrics;
pub mod result;
pub mod trade;

pub use candle::Candle;
pub use equity::EquityPoint;
pub use event::{EngineEvent, ProgressPhase};
pub use increment::RawIncrement;
pub use metrics::Metrics;
pub use result::{AggregateResult, TaskStatus, TerminalResult};
pub use trade::Trade;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bar counters: `null`, negative, fractional or non-finite input clamps to
/// a non-negative whole count instead of failing the message.
pub(crate) fn bar_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if raw.is_finite() && raw > 0.0 {
        Ok(raw as u64)
    } else {
        Ok(0)
    }
}
