//! Fleet-wide verdict from per-device scores.

use core::fmt;

use crate::config::{FleetCfg, ScoringCfg};
use crate::device::score_device_with;
use crate::sample::Device;

/// Fleet health label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FleetLabel {
    Good,
    Moderate,
    Poor,
    /// No device produced a score; there is no evidence either way.
    Unknown,
}

impl FleetLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            FleetLabel::Good => "Good",
            FleetLabel::Moderate => "Moderate",
            FleetLabel::Poor => "Poor",
            FleetLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FleetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one fleet evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetVerdict {
    /// Median device score; 0 when no device was scored.
    pub p50: f64,
    /// Fraction of scored devices in the red band.
    pub red_ratio: f64,
    /// Fraction of scored devices in the yellow band.
    pub yellow_ratio: f64,
    pub label: FleetLabel,
    /// Devices that produced a score.
    pub scored: usize,
    /// Devices excluded for having no data in their window.
    pub unscored: usize,
}

/// Median of an ascending slice; 0 when empty.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Label from fleet statistics. First match wins: Good, then Poor, then Moderate.
/// `scored == 0` is always `Unknown`.
pub fn classify(
    p50: f64,
    red_ratio: f64,
    yellow_ratio: f64,
    scored: usize,
    cfg: &FleetCfg,
) -> FleetLabel {
    if scored == 0 {
        FleetLabel::Unknown
    } else if p50 >= cfg.good_min_p50
        && red_ratio < cfg.good_max_red
        && yellow_ratio < cfg.good_max_yellow
    {
        FleetLabel::Good
    } else if p50 < cfg.poor_below_p50 || red_ratio >= cfg.poor_min_red {
        FleetLabel::Poor
    } else {
        FleetLabel::Moderate
    }
}

/// Reduce already-computed device scores to a verdict.
///
/// `unscored` is carried through for reporting only.
pub fn verdict_from_scores(
    mut scores: Vec<f64>,
    unscored: usize,
    cfg: &FleetCfg,
) -> FleetVerdict {
    scores.sort_by(f64::total_cmp);
    let scored = scores.len();
    let p50 = median(&scores);
    let total = scored.max(1) as f64;
    let red = scores.iter().filter(|&&s| s < cfg.red_below).count();
    let yellow = scores
        .iter()
        .filter(|&&s| s >= cfg.red_below && s < cfg.yellow_below)
        .count();
    let red_ratio = red as f64 / total;
    let yellow_ratio = yellow as f64 / total;
    FleetVerdict {
        p50,
        red_ratio,
        yellow_ratio,
        label: classify(p50, red_ratio, yellow_ratio, scored, cfg),
        scored,
        unscored,
    }
}

/// Score a fleet with an explicit config.
pub fn score_fleet_with(
    devices: &[Device],
    now_ms: i64,
    expected_hz: f64,
    cfg: &ScoringCfg,
) -> FleetVerdict {
    let mut scores = Vec::with_capacity(devices.len());
    let mut unscored = 0usize;
    for d in devices {
        match score_device_with(&d.samples, now_ms, expected_hz, cfg) {
            Some(s) => {
                tracing::debug!(device = %d.id, score = s, "device scored");
                scores.push(s);
            }
            None => {
                tracing::debug!(device = %d.id, "device has no data in window");
                unscored += 1;
            }
        }
    }
    let v = verdict_from_scores(scores, unscored, &cfg.fleet);
    tracing::info!(
        p50 = v.p50,
        red_ratio = v.red_ratio,
        yellow_ratio = v.yellow_ratio,
        label = %v.label,
        scored = v.scored,
        unscored = v.unscored,
        "fleet verdict"
    );
    v
}

/// Score a fleet with the stock config.
#[inline]
pub fn score_fleet(devices: &[Device], now_ms: i64, expected_hz: f64) -> FleetVerdict {
    score_fleet_with(devices, now_ms, expected_hz, &ScoringCfg::STOCK)
}
