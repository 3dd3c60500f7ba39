use tracing::{debug, info, warn};

use crate::model::{AggregateResult, RawIncrement, TaskStatus, TerminalResult};

use super::{merge, reconcile};

/// Holds the single aggregate a chart renders from for one task.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    result: Option<AggregateResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The aggregate so far, or `None` before any data or terminal event.
    pub fn result(&self) -> Option<&AggregateResult> {
        self.result.as_ref()
    }

    /// Owned copy for publishing; an empty running aggregate before any data.
    pub fn snapshot(&self) -> AggregateResult {
        self.result.clone().unwrap_or_default()
    }

    pub fn status(&self) -> TaskStatus {
        self.result
            .as_ref()
            .map(|r| r.status)
            .unwrap_or(TaskStatus::Running)
    }

    /// Once terminal, nothing changes the aggregate again.
    pub fn is_frozen(&self) -> bool {
        self.status().is_terminal()
    }

    /// Merge one combined increment. Ignored once frozen.
    pub fn apply_increment(&mut self, increment: RawIncrement) -> bool {
        if self.is_frozen() {
            debug!("Ignoring increment for {} task", self.status());
            return false;
        }

        match self.result.as_mut() {
            Some(aggregate) => merge::append_increment(aggregate, increment),
            None => self.result = Some(merge::seed_from_increment(increment)),
        }
        true
    }

    /// Reconcile with the engine's terminal payload and freeze.
    pub fn complete(&mut self, terminal: TerminalResult) -> bool {
        if self.is_frozen() {
            debug!("Ignoring completion for {} task", self.status());
            return false;
        }

        let reconciled = reconcile::reconcile_terminal(self.result.take(), terminal);
        info!(
            "Task {}: {} candles, {} equity points, {} trades",
            reconciled.status,
            reconciled.candles.len(),
            reconciled.equity_curve.len(),
            reconciled.trades.len()
        );
        self.result = Some(reconciled);
        true
    }

    /// Mark the task failed with the engine's message and freeze.
    ///
    /// Data already merged stays so the chart keeps what it had.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.is_frozen() {
            return false;
        }

        let message = message.into();
        warn!("Task failed: {}", message);
        let aggregate = self.result.get_or_insert_with(AggregateResult::new);
        aggregate.status = TaskStatus::Failed;
        aggregate.success = false;
        aggregate.error_message = Some(message);
        true
    }

    /// Mark the task cancelled, keeping partial data, and freeze.
    pub fn cancel(&mut self) -> bool {
        if self.is_frozen() {
            return false;
        }

        info!("Task cancelled");
        let aggregate = self.result.get_or_insert_with(AggregateResult::new);
        aggregate.status = TaskStatus::Cancelled;
        aggregate.success = false;
        true
    }
}
