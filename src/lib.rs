pub mod aggregator;
pub mod coalescer;
pub mod config;
pub mod display;
pub mod downsample;
mod error;
pub mod model;
pub mod progress;
pub mod session;
pub mod store;

pub use aggregator::ResultAggregator;
pub use coalescer::{CoalescerState, IncrementCoalescer};
pub use config::StreamConfig;
pub use display::{DisplayCandle, DisplaySeries, display_series};
pub use downsample::{downsample_lttb, downsample_ohlc, safe_min_max};
pub use error::StreamError;
pub use model::{
    AggregateResult, Candle, EngineEvent, EquityPoint, Metrics, RawIncrement, TaskStatus, Trade,
};
pub use progress::{CandleColor, candle_color, is_processed};
pub use session::{SessionRegistry, SessionSnapshot, TaskSession};
pub use store::{InMemoryResultStore, ResultStore};
