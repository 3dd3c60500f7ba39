//! Replay a JSON-lines log of engine events through the streaming pipeline.
//!
//! Run with: cargo run --bin stream_replay -- events.jsonl
//!
//! Configuration via environment variables:
//! - BACKTEST_STREAM_FLUSH_MS: flush interval (default: 100)
//! - BACKTEST_STREAM_MAX_POINTS: point budget per series (default: 2000)
//! - BACKTEST_STREAM_CHANNEL_CAPACITY: per-session event queue (default: 256)
//! - RUST_LOG: log filter (default: info)

use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;

use backtest_stream::display::display_series_with;
use backtest_stream::{
    EngineEvent, InMemoryResultStore, ResultStore, SessionRegistry, SessionSnapshot, StreamConfig,
    StreamError,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: stream_replay <events.jsonl>");
        std::process::exit(2);
    };

    if let Err(e) = run(&path).await {
        error!("Replay failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(path: &str) -> Result<(), StreamError> {
    let config = StreamConfig::from_env()?;
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StreamError::ConfigError(format!("cannot read {}: {}", path, e)))?;

    let store = Arc::new(InMemoryResultStore::new());
    let mut registry = SessionRegistry::new(config.clone())?.with_store(store.clone());
    let mut finals: BTreeMap<String, SessionSnapshot> = BTreeMap::new();

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match EngineEvent::parse(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no + 1, e);
                continue;
            }
        };

        let task_id = event.task_id().to_string();
        if !registry.contains(&task_id) {
            if finals.contains_key(&task_id) {
                warn!("Skipping line {}: task {} already ended", line_no + 1, task_id);
                continue;
            }
            registry.start(&task_id)?;
        }

        if let Some(last) = registry.dispatch(event).await? {
            finals.insert(task_id, last);
        }
    }

    // tasks that never sent a terminal event
    for task_id in registry.task_ids() {
        let last = registry.unsubscribe(&task_id).await?;
        finals.insert(task_id, last);
    }

    for (task_id, snapshot) in &finals {
        let aggregate = match store.read(task_id)? {
            Some(saved) => saved,
            None => snapshot.aggregate.as_ref().clone(),
        };
        let series = display_series_with(&aggregate, &config, Some(snapshot.progress_percent));
        info!(
            "{}: {} | candles {} -> {} | equity {} -> {} | range {:?} | trades {} | pnl {:?}",
            task_id,
            series.status,
            series.original_candle_count,
            series.candles.len(),
            series.original_equity_count,
            series.equity.len(),
            series.equity_range,
            series.trades.len(),
            aggregate.metrics.total_pnl
        );
    }

    Ok(())
}
