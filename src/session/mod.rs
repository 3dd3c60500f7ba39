//! Per-task sessions.
//!
//! A [`TaskSession`] owns exactly one coalescer and one aggregator for one
//! task id and runs as its own tokio task. The [`SessionRegistry`] keys
//! sessions by task id and tears them down when their task ends. Nothing is
//! shared between sessions.

pub mod registry;
mod task;

pub use registry::{SessionHandle, SessionRegistry};
pub use task::{SessionSnapshot, TaskSession};
