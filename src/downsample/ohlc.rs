use std::ops::Range;

use crate::model::Candle;

/// Original index range covered by bucket `index` when `len` items are split
/// into `buckets` contiguous buckets.
///
/// Boundaries are `floor(i * len / buckets)`, computed in integers so the last
/// bucket always ends exactly at `len`.
#[inline]
pub fn bucket_range(index: usize, len: usize, buckets: usize) -> Range<usize> {
    let start = index * len / buckets;
    let end = ((index + 1) * len / buckets).min(len);
    start..end
}

/// Reduce `candles` to exactly `max_points` synthetic candles.
///
/// Each output candle takes the first open, the last close, the bucket's true
/// high and low, and the first timestamp. Volume is reset to zero because it
/// is not meaningful after aggregation.
pub fn downsample_ohlc(candles: &[Candle], max_points: usize) -> Vec<Candle> {
    if candles.len() <= max_points {
        return candles.to_vec();
    }
    if max_points == 0 {
        return Vec::new();
    }

    let len = candles.len();
    let mut result = Vec::with_capacity(max_points);

    for i in 0..max_points {
        let bucket = &candles[bucket_range(i, len, max_points)];
        let (Some(first), Some(last)) = (bucket.first(), bucket.last()) else {
            continue;
        };

        let mut high = f64::NEG_INFINITY;
        let mut low = f64::INFINITY;
        for candle in bucket {
            high = high.max(candle.high);
            low = low.min(candle.low);
        }

        result.push(Candle {
            timestamp: first.timestamp,
            open: first.open,
            high,
            low,
            close: last.close,
            volume: 0.0,
        });
    }

    result
}
