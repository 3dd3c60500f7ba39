//! End-to-end: engine events through a registry session to a display series.

use std::sync::Arc;
use std::time::Duration;

use backtest_stream::display::display_series_with;
use backtest_stream::model::{ProgressPhase, TerminalResult};
use backtest_stream::{
    Candle, CandleColor, EngineEvent, EquityPoint, InMemoryResultStore, Metrics, RawIncrement,
    ResultStore, SessionRegistry, StreamConfig, TaskStatus,
};

fn increment(
    task: &str,
    start: usize,
    count: usize,
    processed: u64,
    total: u64,
    pnl: f64,
) -> EngineEvent {
    let candles = (start..start + count)
        .map(|i| {
            let open = 100.0 + (i as f64 * 0.1).sin() * 5.0;
            let high = open + 1.0 + (i % 5) as f64;
            Candle::new(i as i64 * 60, open, high, open - 1.0, open + 0.25, 10.0)
        })
        .collect();
    let equity = (start..start + count)
        .map(|i| EquityPoint::new(i as i64 * 60, 10_000.0 + i as f64, 0.0))
        .collect();

    EngineEvent::Increment {
        task_id: task.to_string(),
        increment: RawIncrement {
            new_candles: candles,
            new_equity_points: equity,
            new_trades: Vec::new(),
            current_metrics: Metrics {
                total_pnl: Some(pnl),
                ..Default::default()
            },
            processed_bars: processed,
            total_bars: total,
        },
    }
}

#[tokio::test(start_paused = true)]
async fn test_stream_then_complete_without_candles() {
    let store = Arc::new(InMemoryResultStore::new());
    let config = StreamConfig::default();
    let mut registry = SessionRegistry::new(config.clone())
        .unwrap()
        .with_store(store.clone());
    let mut rx = registry.start("bt-1").unwrap();

    registry
        .dispatch(EngineEvent::Progress {
            task_id: "bt-1".to_string(),
            percent: 0.0,
            phase: Some(ProgressPhase::RunningBacktest),
            message: Some("running".to_string()),
        })
        .await
        .unwrap();

    // two windows of 5,000 bars each, 10,000 total
    for chunk in 0..5 {
        let start = chunk * 1000;
        registry
            .dispatch(increment("bt-1", start, 1000, (start + 1000) as u64, 10_000, chunk as f64))
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(150)).await;

    let mid = rx.borrow_and_update().clone();
    assert_eq!(mid.aggregate.candles.len(), 5000);
    assert_eq!(mid.aggregate.processed_bars, 5000);
    assert_eq!(mid.aggregate.metrics.total_pnl, Some(4.0));
    assert_eq!(mid.phase, Some(ProgressPhase::RunningBacktest));

    let view = display_series_with(&mid.aggregate, &config, Some(50.0));
    assert_eq!(view.candles.len(), 2000);
    assert_eq!(view.equity.len(), 2000);
    assert!(view.candles.iter().all(|c| c.processed));

    for chunk in 5..10 {
        let start = chunk * 1000;
        registry
            .dispatch(increment("bt-1", start, 1000, (start + 1000) as u64, 10_000, chunk as f64))
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(rx.borrow().aggregate.candles.len(), 10_000);

    let last = registry
        .dispatch(EngineEvent::Completed {
            task_id: "bt-1".to_string(),
            result: TerminalResult {
                equity_curve: (0..40).map(|i| EquityPoint::new(i, 1.0, 0.0)).collect(),
                metrics: Metrics {
                    total_pnl: Some(123.0),
                    sharpe_ratio: Some(1.5),
                    ..Default::default()
                },
                execution_time_ms: 900,
                ..Default::default()
            },
        })
        .await
        .unwrap()
        .unwrap();

    let aggregate = &last.aggregate;
    assert_eq!(aggregate.status, TaskStatus::Completed);
    assert_eq!(aggregate.candles.len(), 10_000);
    assert_eq!(aggregate.equity_curve.len(), 10_000);
    assert_eq!(aggregate.metrics.total_pnl, Some(123.0));
    assert_eq!(aggregate.execution_time_ms, 900);
    assert_eq!(last.progress_percent, 100.0);

    let saved = store.read("bt-1").unwrap().unwrap();
    assert_eq!(&saved, aggregate.as_ref());

    let max_high = aggregate.candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let view = display_series_with(&saved, &config, Some(100.0));
    let view_high = view.candles.iter().map(|c| c.candle.high).fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(view.candles.len(), 2000);
    assert_eq!(max_high, view_high);
    assert!(view.candles.iter().all(|c| c.color != CandleColor::Pending));
}

#[tokio::test(start_paused = true)]
async fn test_partial_progress_marks_unprocessed_tail() {
    let mut registry = SessionRegistry::default();
    let mut rx = registry.start("bt-2").unwrap();

    // the engine ships all bars up front but has only processed 30%
    registry
        .dispatch(increment("bt-2", 0, 100, 30, 100, 0.0))
        .await
        .unwrap();
    rx.changed().await.unwrap();

    let snapshot = rx.borrow().clone();
    let view = backtest_stream::display_series(&snapshot.aggregate, 2000, None);
    let processed = view.candles.iter().filter(|c| c.processed).count();
    assert_eq!(processed, 30);
    assert!(view.candles[30..].iter().all(|c| c.color == CandleColor::Pending));
}

#[tokio::test(start_paused = true)]
async fn test_error_stops_session() {
    let mut registry = SessionRegistry::default();
    let rx = registry.start("bt-3").unwrap();

    registry.dispatch(increment("bt-3", 0, 10, 10, 100, 0.0)).await.unwrap();
    let last = registry
        .dispatch(EngineEvent::Error {
            task_id: "bt-3".to_string(),
            error: "data provider timeout".to_string(),
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(last.aggregate.status, TaskStatus::Failed);
    assert!(last.aggregate.candles.is_empty());
    assert_eq!(rx.borrow().aggregate.error_message.as_deref(), Some("data provider timeout"));
    assert!(registry.dispatch(increment("bt-3", 10, 10, 20, 100, 0.0)).await.is_err());
}
