//! Result aggregation.
//!
//! The [`ResultAggregator`] folds combined increments into one growing
//! [`AggregateResult`](crate::model::AggregateResult) and reconciles it with
//! the engine's terminal payload.
//!
//! Metric policy differs from the coalescer on purpose: here a metric that
//! the latest snapshot did not report keeps its previous value.

pub mod merge;
pub mod reconcile;

mod manager;

pub use manager::ResultAggregator;
pub use merge::{append_increment, seed_from_increment};
pub use reconcile::reconcile_terminal;
