//! Processed/unprocessed classification for a still-running task.
//!
//! Classification always happens on original, pre-downsample indices. A
//! downsampled point maps back through [`original_index`], so a bucket that
//! straddles the boundary takes the state of its first original member.

pub mod color;

pub use color::CandleColor;
pub use crate::model::ProgressPhase;

/// Whether the bar at `index` has already been computed.
///
/// `total_bars == 0` means the total is unknown.
#[inline]
pub fn is_processed(index: usize, processed_bars: u64, total_bars: u64) -> bool {
    if processed_bars == 0 {
        return false;
    }
    if total_bars > 0 && processed_bars >= total_bars {
        return true;
    }
    (index as u64) < processed_bars
}

/// Original index of the first member behind downsampled point `index`.
#[inline]
pub fn original_index(index: usize, original_len: usize, downsampled_len: usize) -> usize {
    if downsampled_len == 0 || original_len <= downsampled_len {
        return index;
    }
    index * original_len / downsampled_len
}

/// Color for a candle given its direction and processed state.
#[inline]
pub fn candle_color(is_up: bool, processed: bool) -> CandleColor {
    match (processed, is_up) {
        (false, _) => CandleColor::Pending,
        (true, true) => CandleColor::Bullish,
        (true, false) => CandleColor::Bearish,
    }
}

/// Clamp an engine progress percentage into `0..=100`; NaN reads as zero.
#[inline]
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
