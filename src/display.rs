//! Render-time view of an aggregate.
//!
//! [`display_series`] is a pure function of the stored aggregate and the
//! current progress value, so a chart can call it on every animation frame.
//! Ingestion never downsamples; only this path does.

use serde::Serialize;

use crate::config::StreamConfig;
use crate::downsample::{self, EQUITY_MAGNITUDE_LIMIT};
use crate::model::{AggregateResult, Candle, EquityPoint, TaskStatus, Trade};
use crate::progress::{self, CandleColor};

/// A candle ready to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCandle {
    #[serde(flatten)]
    pub candle: Candle,
    pub processed: bool,
    pub color: CandleColor,
}

/// Bounded, render-ready arrays for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySeries<'a> {
    pub status: TaskStatus,
    pub candles: Vec<DisplayCandle>,
    pub equity: Vec<EquityPoint>,
    /// Min/max equity of the drawn curve, `None` when it is empty
    pub equity_range: Option<(f64, f64)>,
    pub trades: &'a [Trade],
    pub original_candle_count: usize,
    pub original_equity_count: usize,
}

/// Build the display series with the default equity guard.
///
/// `progress_percent` is the engine's progress; while the task is running and
/// below 100% the equity curve is cut to that share of its length.
pub fn display_series(
    aggregate: &AggregateResult,
    max_points: usize,
    progress_percent: Option<f64>,
) -> DisplaySeries<'_> {
    build(aggregate, max_points, progress_percent, EQUITY_MAGNITUDE_LIMIT)
}

/// Same as [`display_series`] with budget and equity guard taken from `config`.
pub fn display_series_with<'a>(
    aggregate: &'a AggregateResult,
    config: &StreamConfig,
    progress_percent: Option<f64>,
) -> DisplaySeries<'a> {
    build(
        aggregate,
        config.max_points,
        progress_percent,
        config.equity_magnitude_limit,
    )
}

fn build(
    aggregate: &AggregateResult,
    max_points: usize,
    progress_percent: Option<f64>,
    equity_limit: f64,
) -> DisplaySeries<'_> {
    let equity = visible_equity(aggregate, progress_percent);
    let equity = downsample::sanitize_equity(equity, equity_limit);
    let equity = downsample::downsample_lttb(&equity, max_points, |p| p.equity);
    let equity_range = downsample::safe_min_max(equity.iter().map(|p| p.equity));

    DisplaySeries {
        status: aggregate.status,
        candles: display_candles(aggregate, max_points),
        equity,
        equity_range,
        trades: &aggregate.trades,
        original_candle_count: aggregate.candles.len(),
        original_equity_count: aggregate.equity_curve.len(),
    }
}

fn visible_equity(aggregate: &AggregateResult, progress_percent: Option<f64>) -> &[EquityPoint] {
    let curve = aggregate.equity_curve.as_slice();
    match progress_percent.map(progress::clamp_percent) {
        Some(percent) if aggregate.is_running() && percent < 100.0 => {
            let keep = (percent / 100.0 * curve.len() as f64).floor() as usize;
            &curve[..keep.min(curve.len())]
        }
        _ => curve,
    }
}

fn display_candles(aggregate: &AggregateResult, max_points: usize) -> Vec<DisplayCandle> {
    let original_len = aggregate.candles.len();
    let sampled = downsample::downsample_ohlc(&aggregate.candles, max_points);
    let sampled_len = sampled.len();
    let running = aggregate.is_running();

    sampled
        .into_iter()
        .enumerate()
        .map(|(i, candle)| {
            let processed = !running
                || progress::is_processed(
                    progress::original_index(i, original_len, sampled_len),
                    aggregate.processed_bars,
                    aggregate.total_bars,
                );
            DisplayCandle {
                candle,
                processed,
                color: progress::candle_color(candle.is_up(), processed),
            }
        })
        .collect()
}
