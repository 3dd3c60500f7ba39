use tracing::debug;

use crate::model::EquityPoint;

/// Equity magnitudes at or above this are treated as engine overflow artifacts.
pub const EQUITY_MAGNITUDE_LIMIT: f64 = 1e15;

/// Finite and strictly below `limit` in magnitude.
#[inline]
pub fn is_sane_value(value: f64, limit: f64) -> bool {
    value.is_finite() && value.abs() < limit
}

/// Drop equity points that are non-finite or absurdly large.
///
/// Dropped points are only reported at debug level; they never surface as errors.
pub fn sanitize_equity(points: &[EquityPoint], limit: f64) -> Vec<EquityPoint> {
    let sane: Vec<EquityPoint> = points
        .iter()
        .filter(|p| is_sane_value(p.equity, limit))
        .copied()
        .collect();

    let dropped = points.len() - sane.len();
    if dropped > 0 {
        debug!(
            "Dropped {} of {} equity points outside +/-{:e}",
            dropped,
            points.len(),
            limit
        );
    }

    sane
}

/// Minimum and maximum of `values` in a single pass.
///
/// NaN values are skipped. Returns `None` when nothing comparable remains.
pub fn safe_min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut bounds: Option<(f64, f64)> = None;

    for value in values {
        if value.is_nan() {
            continue;
        }
        bounds = Some(match bounds {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }

    bounds
}
