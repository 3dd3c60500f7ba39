//! Coalescer state machine.

/// Lifecycle of an [`IncrementCoalescer`](super::IncrementCoalescer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoalescerState {
    /// Empty buffer, no timer.
    #[default]
    Idle,

    /// Increments waiting for the flush timer.
    Buffering,

    /// A buffer snapshot is being combined. The buffer itself is already
    /// empty, so anything pushed next opens a new window.
    Flushing,

    /// Terminal. Late increments are dropped.
    Closed,
}

impl CoalescerState {
    /// Whether a pushed increment would be buffered.
    #[inline]
    pub fn accepts_increments(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Get a human-readable state name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Buffering => "buffering",
            Self::Flushing => "flushing",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for CoalescerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
