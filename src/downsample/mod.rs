//! Render-time downsampling.
//!
//! Both reducers are pure and bounded by `max_points`:
//! - [`downsample_ohlc`] buckets candles and keeps the true high/low of each bucket.
//! - [`downsample_lttb`] simplifies a line with Largest-Triangle-Three-Buckets.
//!
//! Input at or under the budget (including empty input) comes back unchanged.
//! Equity values must pass [`sanitize_equity`] before they reach either reducer
//! or [`safe_min_max`].

pub mod bounds;
pub mod lttb;
pub mod ohlc;

pub use bounds::{EQUITY_MAGNITUDE_LIMIT, is_sane_value, safe_min_max, sanitize_equity};
pub use lttb::{downsample_lttb, lttb_indices};
pub use ohlc::{bucket_range, downsample_ohlc};

/// Default point budget for a chart series.
pub const DEFAULT_MAX_POINTS: usize = 2000;
