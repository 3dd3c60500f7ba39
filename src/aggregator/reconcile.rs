//! Reconciling accumulated partial data with the engine's terminal payload.
//!
//! - Candles, trades: accumulated if non-empty, otherwise the terminal copy
//! - Equity curve: whichever has more points; terminal on a tie
//! - Metrics, timing, success: terminal, with unreported metrics kept

use tracing::{debug, warn};

use crate::model::{AggregateResult, TaskStatus, TerminalResult};

fn prefer_accumulated<T>(accumulated: Vec<T>, terminal: Vec<T>) -> Vec<T> {
    if accumulated.is_empty() {
        terminal
    } else {
        accumulated
    }
}

/// Build the final aggregate for a completed task.
///
/// Never shrinks a series that was already accumulated.
pub fn reconcile_terminal(
    accumulated: Option<AggregateResult>,
    terminal: TerminalResult,
) -> AggregateResult {
    let accumulated = accumulated.unwrap_or_default();

    let equity_curve = if accumulated.equity_curve.len() > terminal.equity_curve.len() {
        debug!(
            "Keeping accumulated equity curve ({} points) over terminal ({} points)",
            accumulated.equity_curve.len(),
            terminal.equity_curve.len()
        );
        accumulated.equity_curve
    } else {
        let first_points = (
            accumulated.equity_curve.first(),
            terminal.equity_curve.first(),
        );
        if let (Some(acc), Some(fin)) = first_points {
            if acc.timestamp != fin.timestamp {
                warn!(
                    "Terminal equity curve starts at {} but accumulated curve starts at {}; \
                     using terminal",
                    fin.timestamp, acc.timestamp
                );
            }
        }
        terminal.equity_curve
    };

    let status = if terminal.success {
        TaskStatus::Completed
    } else {
        TaskStatus::Failed
    };

    AggregateResult {
        status,
        success: terminal.success,
        error_message: terminal.error_message,
        candles: prefer_accumulated(accumulated.candles, terminal.candles),
        equity_curve,
        trades: prefer_accumulated(accumulated.trades, terminal.trades),
        metrics: accumulated.metrics.merged_with(&terminal.metrics),
        processed_bars: if terminal.processed_bars > 0 {
            terminal.processed_bars
        } else {
            accumulated.processed_bars
        },
        total_bars: if terminal.total_bars > 0 {
            terminal.total_bars
        } else {
            accumulated.total_bars
        },
        start_time: terminal.start_time,
        end_time: terminal.end_time,
        execution_time_ms: terminal.execution_time_ms,
    }
}
