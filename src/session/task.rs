use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::aggregator::ResultAggregator;
use crate::coalescer::IncrementCoalescer;
use crate::config::StreamConfig;
use crate::model::{AggregateResult, EngineEvent, ProgressPhase, RawIncrement};
use crate::progress;
use crate::store::ResultStore;

/// What subscribers see after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub task_id: String,
    pub aggregate: Arc<AggregateResult>,
    /// Engine-reported progress, independent of processed bars
    pub progress_percent: f64,
    pub phase: Option<ProgressPhase>,
    pub message: Option<String>,
    /// Bumped on every publish
    pub revision: u64,
}

impl SessionSnapshot {
    fn initial(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            aggregate: Arc::new(AggregateResult::new()),
            progress_percent: 0.0,
            phase: None,
            message: None,
            revision: 0,
        }
    }
}

/// Drives one task: engine events in, coalesced snapshots out.
pub struct TaskSession {
    task_id: String,
    coalescer: IncrementCoalescer,
    aggregator: ResultAggregator,
    store: Option<Arc<dyn ResultStore>>,
    snapshot: SessionSnapshot,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl TaskSession {
    pub fn new(
        task_id: impl Into<String>,
        config: &StreamConfig,
    ) -> (Self, watch::Receiver<SessionSnapshot>) {
        let task_id = task_id.into();
        let snapshot = SessionSnapshot::initial(&task_id);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot.clone());

        let session = Self {
            task_id,
            coalescer: IncrementCoalescer::with_interval(config.flush_interval()),
            aggregator: ResultAggregator::new(),
            store: None,
            snapshot,
            snapshot_tx,
        };
        (session, snapshot_rx)
    }

    /// Persist the reconciled result under the task id on completion.
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn coalescer(&self) -> &IncrementCoalescer {
        &self.coalescer
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Apply one engine event. Returns `true` once the task has ended.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        if event.task_id() != self.task_id {
            warn!(
                "Session {} ignoring event for task {}",
                self.task_id,
                event.task_id()
            );
            return false;
        }

        match event {
            EngineEvent::Progress {
                percent,
                phase,
                message,
                ..
            } => {
                self.snapshot.progress_percent = progress::clamp_percent(percent);
                if phase.is_some() {
                    self.snapshot.phase = phase;
                }
                if message.is_some() {
                    self.snapshot.message = message;
                }
                self.publish(false);
                false
            }
            EngineEvent::Increment { increment, .. } => {
                self.coalescer.push(increment);
                false
            }
            EngineEvent::Completed { result, .. } => {
                self.coalescer.close();
                if self.aggregator.complete(result) {
                    self.snapshot.progress_percent = 100.0;
                    self.snapshot.phase = Some(ProgressPhase::Completed);
                    self.persist();
                }
                self.publish(true);
                true
            }
            EngineEvent::Error { error, .. } => {
                self.coalescer.close();
                if self.aggregator.fail(error.clone()) {
                    self.snapshot.phase = Some(ProgressPhase::Failed);
                    self.snapshot.message = Some(error);
                }
                self.publish(true);
                true
            }
            EngineEvent::Cancelled { .. } => {
                // Keep what already arrived; there is no terminal payload to supersede it.
                if let Some(combined) = self.coalescer.flush() {
                    self.aggregator.apply_increment(combined);
                }
                self.coalescer.close();
                self.aggregator.cancel();
                self.publish(true);
                true
            }
        }
    }

    /// Timer expiry: merge the buffered window and publish it.
    pub fn flush_pending(&mut self) -> bool {
        match self.coalescer.flush() {
            Some(combined) => self.merge(combined),
            None => false,
        }
    }

    /// Consumer went away: force one final flush of pending work.
    pub fn detach(&mut self) {
        if let Some(combined) = self.coalescer.dispose() {
            debug!("Session {} flushing pending work on detach", self.task_id);
            self.merge(combined);
        }
    }

    fn merge(&mut self, combined: RawIncrement) -> bool {
        let applied = self.aggregator.apply_increment(combined);
        if applied {
            self.publish(true);
        }
        applied
    }

    fn publish(&mut self, aggregate_changed: bool) {
        if aggregate_changed {
            self.snapshot.aggregate = Arc::new(self.aggregator.snapshot());
        }
        self.snapshot.revision += 1;
        self.snapshot_tx.send_replace(self.snapshot.clone());
    }

    fn persist(&self) {
        let (Some(store), Some(result)) = (&self.store, self.aggregator.result()) else {
            return;
        };
        if let Err(e) = store.save(&self.task_id, result) {
            warn!("Failed to save result for task {}: {}", self.task_id, e);
        }
    }

    /// Run until a terminal event arrives or the event channel closes.
    ///
    /// Returns the final snapshot.
    pub async fn run(mut self, mut events: mpsc::Receiver<EngineEvent>) -> SessionSnapshot {
        info!("Session {} started", self.task_id);

        loop {
            let deadline = self.coalescer.deadline();

            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => {
                            if self.handle_event(event) {
                                break;
                            }
                        }
                        None => {
                            self.detach();
                            break;
                        }
                    }
                }
                _ = wait_for(deadline) => {
                    self.flush_pending();
                }
            }
        }

        let stats = self.coalescer().stats();
        info!(
            "Session {} ended ({}): {} flushes, {} late increments dropped",
            self.task_id,
            self.snapshot.aggregate.status,
            stats.flushes,
            stats.late_increments_dropped
        );
        self.snapshot
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candle, Metrics, TaskStatus, TerminalResult};
    use crate::store::InMemoryResultStore;
    use std::time::Duration;

    fn increment_event(task: &str, ts: i64, pnl: f64) -> EngineEvent {
        EngineEvent::Increment {
            task_id: task.to_string(),
            increment: RawIncrement {
                new_candles: vec![Candle::new(ts, 1.0, 2.0, 0.5, 1.5, 0.0)],
                current_metrics: Metrics {
                    total_pnl: Some(pnl),
                    ..Default::default()
                },
                processed_bars: ts as u64 + 1,
                total_bars: 100,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_progress_is_clamped_and_published() {
        let (mut session, rx) = TaskSession::new("t1", &StreamConfig::default());
        session.handle_event(EngineEvent::Progress {
            task_id: "t1".to_string(),
            percent: 140.0,
            phase: Some(ProgressPhase::RunningBacktest),
            message: None,
        });

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.progress_percent, 100.0);
        assert_eq!(snapshot.phase, Some(ProgressPhase::RunningBacktest));
        assert_eq!(snapshot.revision, 1);
    }

    #[tokio::test]
    async fn test_foreign_task_ignored() {
        let (mut session, _rx) = TaskSession::new("t1", &StreamConfig::default());
        assert!(!session.handle_event(increment_event("t2", 0, 1.0)));
        assert_eq!(session.coalescer().pending_len(), 0);
    }

    #[tokio::test]
    async fn test_negative_processed_bars_still_delivers_candles() {
        let (mut session, _rx) = TaskSession::new("t1", &StreamConfig::default());
        let raw = r#"{"type":"increment","taskId":"t1","increment":{
            "newCandles":[{"timestamp":60,"open":1,"high":2,"low":0.5,"close":1.5}],
            "processedBars":-1,"totalBars":10
        }}"#;

        session.handle_event(EngineEvent::parse(raw).unwrap());
        assert!(session.flush_pending());

        let aggregate = &session.snapshot().aggregate;
        assert_eq!(aggregate.candles.len(), 1);
        assert_eq!(aggregate.processed_bars, 0);
        assert_eq!(aggregate.total_bars, 10);
    }

    #[tokio::test]
    async fn test_completion_discards_pending_and_persists() {
        let store = Arc::new(InMemoryResultStore::new());
        let (session, _rx) = TaskSession::new("t1", &StreamConfig::default());
        let mut session = session.with_store(store.clone());

        session.handle_event(increment_event("t1", 0, 1.0));
        session.flush_pending();
        session.handle_event(increment_event("t1", 1, 2.0));

        let done = session.handle_event(EngineEvent::Completed {
            task_id: "t1".to_string(),
            result: TerminalResult::default(),
        });

        assert!(done);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.aggregate.status, TaskStatus::Completed);
        // the second increment was still buffered and is superseded
        assert_eq!(snapshot.aggregate.candles.len(), 1);
        assert_eq!(store.read("t1").unwrap().unwrap().candles.len(), 1);
    }

    #[tokio::test]
    async fn test_error_blocks_late_increments() {
        let (mut session, _rx) = TaskSession::new("t1", &StreamConfig::default());
        session.handle_event(increment_event("t1", 0, 1.0));
        session.handle_event(EngineEvent::Error {
            task_id: "t1".to_string(),
            error: "boom".to_string(),
        });
        session.handle_event(increment_event("t1", 1, 2.0));
        session.flush_pending();

        let aggregate = &session.snapshot().aggregate;
        assert_eq!(aggregate.status, TaskStatus::Failed);
        assert_eq!(aggregate.error_message.as_deref(), Some("boom"));
        assert!(aggregate.candles.is_empty());
        assert_eq!(session.coalescer().stats().late_increments_dropped, 1);
    }

    #[tokio::test]
    async fn test_cancel_keeps_received_data() {
        let (mut session, _rx) = TaskSession::new("t1", &StreamConfig::default());
        session.handle_event(increment_event("t1", 0, 1.0));
        session.handle_event(EngineEvent::Cancelled {
            task_id: "t1".to_string(),
        });

        let aggregate = &session.snapshot().aggregate;
        assert_eq!(aggregate.status, TaskStatus::Cancelled);
        assert_eq!(aggregate.candles.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_coalesces_one_window() {
        let (session, mut rx) = TaskSession::new("t1", &StreamConfig::default());
        let (tx, events) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(events));

        for (ts, pnl) in [(0, 1.0), (1, 2.0), (2, 3.0)] {
            tx.send(increment_event("t1", ts, pnl)).await.unwrap();
        }

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.aggregate.candles.len(), 3);
        assert_eq!(snapshot.aggregate.metrics.total_pnl, Some(3.0));
        assert_eq!(snapshot.revision, 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!rx.has_changed().unwrap());

        drop(tx);
        let last = handle.await.unwrap();
        assert_eq!(last.aggregate.status, TaskStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_flushes_on_channel_close() {
        let (session, _rx) = TaskSession::new("t1", &StreamConfig::default());
        let (tx, events) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(events));

        tx.send(increment_event("t1", 0, 1.0)).await.unwrap();
        tx.send(increment_event("t1", 1, 2.0)).await.unwrap();
        drop(tx);

        let last = handle.await.unwrap();
        assert_eq!(last.aggregate.candles.len(), 2);
    }
}
