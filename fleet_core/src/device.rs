//! Per-device aggregation.
//!
//! One device's recent samples reduce to a single score in `[0, 100]`:
//!
//! - **Window**: the base window widens once (no search loop) when it holds
//!   fewer than `min_samples`, capped at `max_ms`.
//! - **Accuracy (A)**: symmetric trimmed mean of per-sample scores.
//! - **Freshness (F)**: linear decay on the age of the newest sample.
//! - **Availability (V)**: actual/expected rate ratio mapped through a band,
//!   then discounted by `F / 100` so a lagging device loses rate credit.
//!
//! `S = w_a * A + w_f * F + w_v * V * F / 100`, clamped to `[0, 100]`.
//! A device with no sample in the selected window has no score at all.

use crate::accuracy::score_sample_with;
use crate::config::{AvailabilityCfg, FreshnessCfg, ScoringCfg, WindowCfg};
use crate::sample::Sample;
use crate::util::{MILLIS_PER_SEC, mean, ramp_up};

/// Result of the one-shot window selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSelection {
    /// Samples with `0 <= now - ts <= base_ms`.
    pub count_base: usize,
    /// Widening factor applied to `base_ms` (before the `max_ms` cap).
    pub scale: u64,
    /// Effective window width in ms.
    pub width_ms: u64,
}

/// Breakdown of one device score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceBreakdown {
    /// Composite score in `[0, 100]`.
    pub score: f64,
    pub accuracy: f64,
    pub freshness: f64,
    /// Availability before the freshness discount.
    pub availability: f64,
    /// Availability after the freshness discount.
    pub availability_eff: f64,
    pub window: WindowSelection,
    /// Samples inside the effective window.
    pub window_count: usize,
    /// Age of the newest in-window sample, in seconds.
    pub age_s: f64,
}

#[inline]
fn within(sample: &Sample, now_ms: i64, width_ms: u64) -> bool {
    let age = sample.age_ms(now_ms);
    age >= 0 && (age as u64) <= width_ms
}

/// Pick the evaluation window for one device.
///
/// Future timestamps are never counted.
pub fn select_window(samples: &[Sample], now_ms: i64, cfg: &WindowCfg) -> WindowSelection {
    let count_base = samples
        .iter()
        .filter(|s| within(s, now_ms, cfg.base_ms))
        .count();
    let scale = if count_base > 0 {
        (cfg.min_samples as u64).div_ceil(count_base as u64)
    } else {
        u64::from(cfg.silent_scale)
    };
    let width_ms = cfg.max_ms.min(cfg.base_ms.saturating_mul(scale.max(1)));
    WindowSelection {
        count_base,
        scale,
        width_ms,
    }
}

/// Mean after dropping `floor(n * ratio)` values from each end.
///
/// Sorts `scores` in place. When trimming would leave nothing, the full set
/// is averaged. Returns `None` for an empty slice.
pub fn trimmed_mean(scores: &mut [f64], ratio: f64) -> Option<f64> {
    scores.sort_by(f64::total_cmp);
    let n = scores.len();
    let trim = (n as f64 * ratio).floor() as usize;
    if n > 2 * trim {
        mean(&scores[trim..n - trim])
    } else {
        mean(scores)
    }
}

/// Freshness from the age (s) of the newest sample.
pub fn freshness_score(age_s: f64, cfg: &FreshnessCfg) -> f64 {
    if age_s <= cfg.fresh_s {
        100.0
    } else if age_s >= cfg.stale_s {
        0.0
    } else {
        100.0 * (1.0 - (age_s - cfg.fresh_s) / (cfg.stale_s - cfg.fresh_s))
    }
}

/// Availability from the sample count in a window of `width_ms`.
///
/// A non-positive (or NaN) `expected_hz` disables the penalty.
pub fn availability_score(
    count: usize,
    width_ms: u64,
    expected_hz: f64,
    cfg: &AvailabilityCfg,
) -> f64 {
    let width_s = width_ms as f64 / MILLIS_PER_SEC;
    let ratio = if expected_hz > 0.0 && width_s > 0.0 {
        (count as f64 / width_s) / expected_hz
    } else {
        1.0
    };
    100.0 * ramp_up(ratio, cfg.floor_ratio, cfg.full_ratio)
}

/// Score one device and keep every intermediate term.
///
/// Returns `None` when no sample falls inside the selected window.
pub fn score_device_detailed(
    samples: &[Sample],
    now_ms: i64,
    expected_hz: f64,
    cfg: &ScoringCfg,
) -> Option<DeviceBreakdown> {
    let window = select_window(samples, now_ms, &cfg.window);
    tracing::trace!(
        count_base = window.count_base,
        scale = window.scale,
        width_ms = window.width_ms,
        "window selected"
    );

    let mut scores = Vec::new();
    let mut latest_ms = i64::MIN;
    for s in samples.iter().filter(|s| within(s, now_ms, window.width_ms)) {
        scores.push(score_sample_with(&cfg.accuracy, s.accuracy_m, s.speed_or_zero()));
        latest_ms = latest_ms.max(s.timestamp_ms);
    }
    let window_count = scores.len();
    let accuracy = trimmed_mean(&mut scores, cfg.window.trim_ratio)?;

    let age_s = (now_ms.saturating_sub(latest_ms) as f64 / MILLIS_PER_SEC).max(0.0);
    let freshness = freshness_score(age_s, &cfg.freshness);
    let availability = availability_score(
        window_count,
        window.width_ms,
        expected_hz,
        &cfg.availability,
    );
    let availability_eff = availability * (freshness / 100.0);

    let w = &cfg.weights;
    let score = (w.accuracy * accuracy
        + w.freshness * freshness
        + w.availability * availability_eff)
        .clamp(0.0, 100.0);

    Some(DeviceBreakdown {
        score,
        accuracy,
        freshness,
        availability,
        availability_eff,
        window,
        window_count,
        age_s,
    })
}

/// Score one device with an explicit config.
#[inline]
pub fn score_device_with(
    samples: &[Sample],
    now_ms: i64,
    expected_hz: f64,
    cfg: &ScoringCfg,
) -> Option<f64> {
    score_device_detailed(samples, now_ms, expected_hz, cfg).map(|b| b.score)
}

/// Score one device with the stock config. `None` means no data.
#[inline]
pub fn score_device(samples: &[Sample], now_ms: i64, expected_hz: f64) -> Option<f64> {
    score_device_with(samples, now_ms, expected_hz, &ScoringCfg::STOCK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_mean_drops_symmetric_tails() {
        // n=10 -> trim 1 from each end
        let mut v = vec![0.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 100.0];
        assert_eq!(trimmed_mean(&mut v, 0.10), Some(50.0));
    }

    #[test]
    fn trimmed_mean_small_sets_are_untrimmed() {
        // n=9 -> floor(0.9) = 0, nothing trimmed
        let mut v = vec![0.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0];
        assert_eq!(trimmed_mean(&mut v, 0.10), Some(80.0));
        let mut one = vec![42.0];
        assert_eq!(trimmed_mean(&mut one, 0.49), Some(42.0));
        assert_eq!(trimmed_mean(&mut [], 0.10), None);
    }

    #[test]
    fn trimmed_mean_falls_back_when_trim_would_empty() {
        // ratio 0.5 with n=2 -> trim 1, 2 > 2 is false -> untrimmed
        let mut v = vec![10.0, 30.0];
        assert_eq!(trimmed_mean(&mut v, 0.5), Some(20.0));
    }

    #[test]
    fn freshness_edges() {
        let cfg = FreshnessCfg::STOCK;
        assert_eq!(freshness_score(0.0, &cfg), 100.0);
        assert_eq!(freshness_score(10.0, &cfg), 100.0);
        assert!((freshness_score(35.0, &cfg) - 50.0).abs() < 1e-9);
        assert_eq!(freshness_score(60.0, &cfg), 0.0);
        assert_eq!(freshness_score(600.0, &cfg), 0.0);
    }

    #[test]
    fn availability_disabled_for_non_positive_rate() {
        let cfg = AvailabilityCfg::STOCK;
        assert_eq!(availability_score(1, 180_000, 0.0, &cfg), 100.0);
        assert_eq!(availability_score(1, 180_000, -2.0, &cfg), 100.0);
        assert_eq!(availability_score(1, 180_000, f64::NAN, &cfg), 100.0);
    }
}
