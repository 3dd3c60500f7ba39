//! Arrival-ordered buffer of raw increments awaiting a flush.

use crate::model::RawIncrement;

/// Counters for monitoring and debugging.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoalescerStats {
    pub increments_buffered: u64,
    pub flushes: u64,
    pub increments_discarded: u64,
    pub late_increments_dropped: u64,
}

/// FIFO of pending increments. Never reorders or drops on its own.
#[derive(Debug, Default)]
pub struct PendingBuffer {
    pending: Vec<RawIncrement>,
    pending_candles: usize,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, increment: RawIncrement) {
        self.pending_candles += increment.new_candles.len();
        self.pending.push(increment);
    }

    /// Number of buffered increments.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Candles across all buffered increments.
    pub fn pending_candles(&self) -> usize {
        self.pending_candles
    }

    /// Move the buffered increments out, leaving the buffer empty.
    pub fn take_snapshot(&mut self) -> Vec<RawIncrement> {
        self.pending_candles = 0;
        std::mem::take(&mut self.pending)
    }

    /// Drop everything buffered. Returns how many increments were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.pending_candles = 0;
        dropped
    }
}
