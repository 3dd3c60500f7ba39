//! The IncrementCoalescer owns the pending buffer and the flush timer for one task.
//!
//! It does no I/O and never sleeps: the timer is a deadline that the owning
//! session waits on. That keeps the batching logic testable without a UI or
//! an event loop.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::model::RawIncrement;

use super::buffer::{CoalescerStats, PendingBuffer};
use super::rules;
use super::state::CoalescerState;

/// Default delay between the first buffered increment and its flush.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Buffers raw increments and merges them on a fixed tick.
#[derive(Debug)]
pub struct IncrementCoalescer {
    buffer: PendingBuffer,
    state: CoalescerState,
    /// When the current window's timer fires; `None` while no timer is armed
    deadline: Option<Instant>,
    flush_interval: Duration,
    stats: CoalescerStats,
}

impl IncrementCoalescer {
    /// Create a coalescer with the default 100 ms flush interval.
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_FLUSH_INTERVAL)
    }

    pub fn with_interval(flush_interval: Duration) -> Self {
        Self {
            buffer: PendingBuffer::new(),
            state: CoalescerState::Idle,
            deadline: None,
            flush_interval,
            stats: CoalescerStats::default(),
        }
    }

    pub fn state(&self) -> CoalescerState {
        self.state
    }

    pub fn stats(&self) -> &CoalescerStats {
        &self.stats
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    /// Number of increments waiting for the next flush.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Deadline of the armed flush timer, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the armed timer has expired at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Buffer an increment, arming the flush timer if none is running.
    ///
    /// Returns `false` if the coalescer is closed and the increment was dropped.
    pub fn push(&mut self, increment: RawIncrement) -> bool {
        if !self.state.accepts_increments() {
            self.stats.late_increments_dropped += 1;
            debug!(
                "Dropping late increment ({} candles) after terminal event",
                increment.new_candles.len()
            );
            return false;
        }

        self.buffer.push(increment);
        self.stats.increments_buffered += 1;

        if self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.flush_interval);
            trace!("Flush timer armed for {:?}", self.flush_interval);
        }
        self.state = CoalescerState::Buffering;

        true
    }

    /// Combine everything buffered into one increment and disarm the timer.
    ///
    /// An empty buffer is a no-op and yields `None`.
    pub fn flush(&mut self) -> Option<RawIncrement> {
        self.deadline = None;

        if self.buffer.is_empty() {
            if !self.state.is_closed() {
                self.state = CoalescerState::Idle;
            }
            return None;
        }

        let closed = self.state.is_closed();
        self.state = CoalescerState::Flushing;

        let candles = self.buffer.pending_candles();
        let snapshot = self.buffer.take_snapshot();
        let count = snapshot.len();
        let combined = rules::combine_increments(snapshot);

        self.stats.flushes += 1;
        self.state = if closed {
            CoalescerState::Closed
        } else {
            CoalescerState::Idle
        };

        if let Some(ref combined) = combined {
            trace!(
                "Flushed {} increments ({} candles, {} equity points, {} trades)",
                count,
                candles,
                combined.new_equity_points.len(),
                combined.new_trades.len()
            );
        }

        combined
    }

    /// Flush only if the armed timer has expired at `now`.
    pub fn flush_if_due(&mut self, now: Instant) -> Option<RawIncrement> {
        if self.is_due(now) {
            self.flush()
        } else {
            None
        }
    }

    /// Terminal event: cancel the timer, throw away buffered work, and refuse
    /// everything that arrives afterwards.
    ///
    /// The engine's terminal payload supersedes partial data, so nothing is
    /// flushed. Returns the number of discarded increments.
    pub fn close(&mut self) -> usize {
        self.deadline = None;
        let discarded = self.buffer.clear();
        self.stats.increments_discarded += discarded as u64;
        self.state = CoalescerState::Closed;

        if discarded > 0 {
            warn!(
                "Discarded {} buffered increments on terminal event",
                discarded
            );
        }

        discarded
    }

    /// Teardown: if a flush is pending, force it once, then close.
    ///
    /// Buffered work is handed back instead of being silently lost.
    pub fn dispose(&mut self) -> Option<RawIncrement> {
        let combined = if self.deadline.is_some() {
            self.flush()
        } else {
            None
        };
        self.state = CoalescerState::Closed;
        combined
    }
}

impl Default for IncrementCoalescer {
    fn default() -> Self {
        Self::new()
    }
}
