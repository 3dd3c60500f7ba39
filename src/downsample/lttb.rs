//! Largest-Triangle-Three-Buckets line simplification.
//!
//! The x coordinate of a point is its position in the series; the y
//! coordinate comes from the caller's accessor, so any point type works.

/// Indices selected by LTTB for a series of `len` points whose y value is
/// given by `y(index)`.
///
/// The first and last index are always kept. Selection is fully
/// deterministic: ties keep the earliest candidate.
pub fn lttb_indices<F>(len: usize, max_points: usize, y: F) -> Vec<usize>
where
    F: Fn(usize) -> f64,
{
    if len <= max_points {
        return (0..len).collect();
    }
    match max_points {
        0 => return Vec::new(),
        1 => return vec![0],
        2 => return vec![0, len - 1],
        _ => {}
    }

    let inner = len - 2;
    let buckets = max_points - 2;
    // floor(i * inner / buckets) + 1, kept in integers to avoid drift
    let boundary = |i: usize| (i * inner / buckets + 1).min(len - 1);

    let mut selected = Vec::with_capacity(max_points);
    selected.push(0);
    let mut a = 0usize;

    for i in 0..buckets {
        let range_start = boundary(i);
        let range_end = boundary(i + 1);

        // Centroid of the next bucket; the final bucket looks at the last point.
        let next_start = range_end;
        let next_end = if i + 1 == buckets {
            len
        } else {
            boundary(i + 2).max(next_start + 1)
        };
        let count = (next_end - next_start) as f64;
        let mut avg_x = 0.0;
        let mut avg_y = 0.0;
        for j in next_start..next_end {
            avg_x += j as f64;
            avg_y += y(j);
        }
        avg_x /= count;
        avg_y /= count;

        let ax = a as f64;
        let ay = y(a);
        let mut max_area = -1.0f64;
        let mut max_idx = range_start;

        for j in range_start..range_end {
            let bx = j as f64;
            let by = y(j);
            let area = ((ax - avg_x) * (by - ay) - (ax - bx) * (avg_y - ay)).abs() * 0.5;
            if area > max_area {
                max_area = area;
                max_idx = j;
            }
        }

        selected.push(max_idx);
        a = max_idx;
    }

    selected.push(len - 1);
    selected
}

/// Simplify `series` to at most `max_points` points, comparing the value
/// returned by `accessor`.
pub fn downsample_lttb<T, F>(series: &[T], max_points: usize, accessor: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    if series.len() <= max_points {
        return series.to_vec();
    }

    lttb_indices(series.len(), max_points, |i| accessor(&series[i]))
        .into_iter()
        .map(|i| series[i].clone())
        .collect()
}
