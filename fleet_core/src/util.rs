//! Small numeric helpers shared by the scoring stages.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: f64 = 1_000.0;

/// Clamp `x` into `[0.0, 1.0]`. NaN maps to 0.
#[inline]
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Linear ramp that is 0 at `lo`, 1 at `hi`, and clamped outside.
/// - Requires `lo < hi`; a degenerate span yields a step at `hi`.
#[inline]
pub fn ramp_up(x: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span <= 0.0 {
        return if x >= hi { 1.0 } else { 0.0 };
    }
    clamp01((x - lo) / span)
}

/// Arithmetic mean; `None` for an empty slice.
#[inline]
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}
