//! Per-sample accuracy score.
//!
//! Maps one `(error_m, speed_kmh)` pair to `[0, 100]` with three piecewise
//! linear thresholds (green, yellow, red). Fast movement widens all three
//! thresholds by the same boost, so a noisy fix at highway speed is not
//! penalized like the same fix from a parked device.

use crate::config::AccuracyCfg;

/// Score at the yellow threshold.
const YELLOW_SCORE: f64 = 60.0;

/// Threshold widening (metres) for a given speed.
///
/// - `speed >= fast_kmh`: flat `fast_boost_m`
/// - `moderate_kmh <= speed < fast_kmh`: linear from `moderate_boost_m` towards `fast_boost_m`
/// - slower (or NaN): no boost
pub fn speed_boost_m(speed_kmh: f64, cfg: &AccuracyCfg) -> f64 {
    if speed_kmh >= cfg.fast_kmh {
        cfg.fast_boost_m
    } else if speed_kmh >= cfg.moderate_kmh {
        let t = (speed_kmh - cfg.moderate_kmh) / (cfg.fast_kmh - cfg.moderate_kmh);
        cfg.moderate_boost_m + t * (cfg.fast_boost_m - cfg.moderate_boost_m)
    } else {
        0.0
    }
}

/// Score one fix with explicit thresholds.
///
/// A missing or non-finite error radius scores 0: no accuracy information is
/// treated as a quality failure.
pub fn score_sample_with(cfg: &AccuracyCfg, error_m: Option<f64>, speed_kmh: f64) -> f64 {
    let Some(err) = error_m.filter(|e| e.is_finite()) else {
        return 0.0;
    };
    let boost = speed_boost_m(speed_kmh, cfg);
    let g = cfg.green_m + boost;
    let y = cfg.yellow_m + boost;
    let r = cfg.red_m + boost;

    let score = if err <= g {
        100.0
    } else if err <= y {
        100.0 - (err - g) * (100.0 - YELLOW_SCORE) / (y - g)
    } else if err <= r {
        YELLOW_SCORE - (err - y) * YELLOW_SCORE / (r - y)
    } else {
        0.0
    };
    score.clamp(0.0, 100.0)
}

/// Score one fix with the stock thresholds (12 / 35 / 80 m).
#[inline]
pub fn score_sample(error_m: Option<f64>, speed_kmh: f64) -> f64 {
    score_sample_with(&AccuracyCfg::STOCK, error_m, speed_kmh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_is_continuous_at_band_edges() {
        let cfg = AccuracyCfg::STOCK;
        assert_eq!(speed_boost_m(49.999, &cfg), 0.0);
        assert_eq!(speed_boost_m(50.0, &cfg), 5.0);
        assert!((speed_boost_m(70.0, &cfg) - 7.5).abs() < 1e-12);
        assert!((speed_boost_m(89.999, &cfg) - 10.0).abs() < 1e-3);
        assert_eq!(speed_boost_m(90.0, &cfg), 10.0);
        assert_eq!(speed_boost_m(250.0, &cfg), 10.0);
    }

    #[test]
    fn nan_speed_gets_no_boost() {
        assert_eq!(speed_boost_m(f64::NAN, &AccuracyCfg::STOCK), 0.0);
    }

    #[test]
    fn negative_error_counts_as_perfect() {
        assert_eq!(score_sample(Some(-3.0), 0.0), 100.0);
    }
}
