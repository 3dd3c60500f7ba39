//! Folding combined increments into the running aggregate.

use crate::model::{AggregateResult, RawIncrement};

/// First increment for a task: a fresh successful aggregate holding the
/// increment's data directly, with zeroed timing.
pub fn seed_from_increment(increment: RawIncrement) -> AggregateResult {
    AggregateResult {
        candles: increment.new_candles,
        equity_curve: increment.new_equity_points,
        trades: increment.new_trades,
        metrics: increment.current_metrics,
        processed_bars: increment.processed_bars,
        total_bars: increment.total_bars,
        ..AggregateResult::new()
    }
}

/// Append series data and merge metrics key by key.
///
/// Series only grow. Bar counters follow the latest increment, except that a
/// zero total (not reported) keeps the known total.
pub fn append_increment(aggregate: &mut AggregateResult, increment: RawIncrement) {
    aggregate.candles.extend(increment.new_candles);
    aggregate.equity_curve.extend(increment.new_equity_points);
    aggregate.trades.extend(increment.new_trades);
    aggregate.metrics = aggregate.metrics.merged_with(&increment.current_metrics);
    aggregate.processed_bars = increment.processed_bars;
    if increment.total_bars > 0 {
        aggregate.total_bars = increment.total_bars;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candle, EquityPoint, Metrics, TaskStatus};

    fn increment(ts: i64, metrics: Metrics) -> RawIncrement {
        RawIncrement {
            new_candles: vec![Candle::new(ts, 1.0, 2.0, 0.5, 1.5, 0.0)],
            new_equity_points: vec![EquityPoint::new(ts, 100.0, 0.0)],
            new_trades: Vec::new(),
            current_metrics: metrics,
            processed_bars: ts as u64 + 1,
            total_bars: 50,
        }
    }

    #[test]
    fn test_seed() {
        let seeded = seed_from_increment(increment(
            0,
            Metrics {
                total_pnl: Some(1.0),
                ..Default::default()
            },
        ));

        assert_eq!(seeded.status, TaskStatus::Running);
        assert!(seeded.success);
        assert_eq!(seeded.candles.len(), 1);
        assert_eq!(seeded.metrics.total_pnl, Some(1.0));
        assert_eq!(seeded.execution_time_ms, 0);
        assert_eq!(seeded.total_bars, 50);
    }

    #[test]
    fn test_append_merges_metrics_field_by_field() {
        let mut aggregate = seed_from_increment(increment(
            0,
            Metrics {
                total_pnl: Some(1.0),
                win_rate: Some(0.5),
                ..Default::default()
            },
        ));

        append_increment(
            &mut aggregate,
            increment(
                1,
                Metrics {
                    total_pnl: Some(2.0),
                    ..Default::default()
                },
            ),
        );

        assert_eq!(aggregate.candles.len(), 2);
        assert_eq!(aggregate.equity_curve.len(), 2);
        assert_eq!(aggregate.metrics.total_pnl, Some(2.0));
        assert_eq!(aggregate.metrics.win_rate, Some(0.5));
        assert_eq!(aggregate.processed_bars, 2);
    }

    #[test]
    fn test_unreported_total_keeps_known_total() {
        let mut aggregate = seed_from_increment(increment(0, Metrics::default()));
        append_increment(
            &mut aggregate,
            RawIncrement {
                processed_bars: 7,
                ..Default::default()
            },
        );

        assert_eq!(aggregate.processed_bars, 7);
        assert_eq!(aggregate.total_bars, 50);
    }
}
