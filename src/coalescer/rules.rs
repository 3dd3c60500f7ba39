//! How a window of raw increments collapses into one.
//!
//! - Candles, equity points, trades: concatenated in arrival order
//! - Metrics: the last increment's snapshot, taken wholesale
//! - Bar counters: the last increment's values

use crate::model::RawIncrement;

/// Combine a flush window into a single increment.
///
/// Returns `None` for an empty window.
pub fn combine_increments(increments: Vec<RawIncrement>) -> Option<RawIncrement> {
    let mut iter = increments.into_iter();
    let mut combined = iter.next()?;

    for increment in iter {
        combined.new_candles.extend(increment.new_candles);
        combined.new_equity_points.extend(increment.new_equity_points);
        combined.new_trades.extend(increment.new_trades);
        combined.current_metrics = increment.current_metrics;
        combined.processed_bars = increment.processed_bars;
        combined.total_bars = increment.total_bars;
    }

    Some(combined)
}
