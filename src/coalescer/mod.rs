//! Increment coalescing.
//!
//! Raw increments can arrive far faster than a chart can usefully redraw. The
//! coalescer buffers them and hands out at most one combined increment per
//! flush interval.
//!
//! # States
//!
//! - **Idle**: nothing buffered, no timer armed
//! - **Buffering**: at least one increment waiting, timer armed
//! - **Flushing**: a snapshot of the buffer is being combined
//! - **Closed**: a terminal event was seen; every later increment is dropped
//!
//! Within one flush the latest metrics snapshot replaces the others
//! wholesale. Field-by-field metric merging happens later, in the aggregator.

pub mod buffer;
pub mod manager;
pub mod rules;
pub mod state;

pub use buffer::{CoalescerStats, PendingBuffer};
pub use manager::IncrementCoalescer;
pub use rules::combine_increments;
pub use state::CoalescerState;
