//! `ScoringEngine` and its builder.
//!
//! The engine bundles a validated `ScoringCfg` with the expected sample rate.
//! It holds no per-call state: every method is a pure function of its
//! inputs, so one engine can be shared across threads.

use fleet_traits::Clock;

use crate::config::*;
use crate::device::{DeviceBreakdown, score_device_detailed};
use crate::error::{BuildError, FleetError, Result};
use crate::fleet::{FleetVerdict, score_fleet_with};
use crate::sample::{Device, Sample};
use crate::source::TelemetrySource;

/// Default expected per-device sample rate (Hz).
pub const DEFAULT_EXPECTED_HZ: f64 = 1.0;

/// Configured scoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringEngine {
    cfg: ScoringCfg,
    expected_hz: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            cfg: ScoringCfg::STOCK,
            expected_hz: DEFAULT_EXPECTED_HZ,
        }
    }
}

/// Per-device result used by reporting: the device id and its breakdown,
/// or `None` when the device had no data in its window.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReport {
    pub id: String,
    pub breakdown: Option<DeviceBreakdown>,
}

impl ScoringEngine {
    /// Start building an engine.
    pub fn builder() -> ScoringEngineBuilder {
        ScoringEngineBuilder::default()
    }

    /// Build an engine from a parsed TOML config, validating it first.
    pub fn from_config(c: &fleet_config::Config) -> Result<Self> {
        c.validate()
            .map_err(|e| eyre::Report::new(FleetError::Config(e.to_string())))?;
        let cfg: ScoringCfg = c.into();
        Self::builder()
            .with_config(cfg)
            .with_expected_hz(c.availability.expected_hz)
            .build()
    }

    /// Return the active configuration.
    pub fn cfg(&self) -> &ScoringCfg {
        &self.cfg
    }

    /// Return the expected per-device sample rate (Hz).
    pub fn expected_hz(&self) -> f64 {
        self.expected_hz
    }

    /// Score one device. `None` means no data in the selected window.
    pub fn score_device(&self, samples: &[Sample], now_ms: i64) -> Option<f64> {
        self.score_device_detailed(samples, now_ms).map(|b| b.score)
    }

    /// Score one device and keep the intermediate terms.
    pub fn score_device_detailed(
        &self,
        samples: &[Sample],
        now_ms: i64,
    ) -> Option<DeviceBreakdown> {
        score_device_detailed(samples, now_ms, self.expected_hz, &self.cfg)
    }

    /// Score every device and reduce to a fleet verdict.
    pub fn score_fleet(&self, devices: &[Device], now_ms: i64) -> FleetVerdict {
        score_fleet_with(devices, now_ms, self.expected_hz, &self.cfg)
    }

    /// Per-device breakdowns in input order.
    pub fn device_reports(&self, devices: &[Device], now_ms: i64) -> Vec<DeviceReport> {
        devices
            .iter()
            .map(|d| DeviceReport {
                id: d.id.clone(),
                breakdown: self.score_device_detailed(&d.samples, now_ms),
            })
            .collect()
    }

    /// Pull a snapshot from `source` and score it at `clock.now_ms()`.
    ///
    /// A failing source is the only error path.
    pub fn evaluate<S, C>(&self, source: &mut S, clock: &C) -> Result<FleetVerdict>
    where
        S: TelemetrySource + ?Sized,
        C: Clock + ?Sized,
    {
        let devices = source.snapshot().map_err(|e| {
            tracing::warn!(error = %e, "telemetry snapshot failed");
            eyre::Report::new(FleetError::Source(e.to_string()))
        })?;
        let now_ms = clock.now_ms();
        Ok(self.score_fleet(&devices, now_ms))
    }
}

/// Builder for `ScoringEngine`. Unset parts fall back to the stock values;
/// everything is validated on `build()`.
#[derive(Debug, Default)]
pub struct ScoringEngineBuilder {
    accuracy: Option<AccuracyCfg>,
    window: Option<WindowCfg>,
    freshness: Option<FreshnessCfg>,
    availability: Option<AvailabilityCfg>,
    weights: Option<WeightsCfg>,
    fleet: Option<FleetCfg>,
    expected_hz: Option<f64>,
}

impl ScoringEngineBuilder {
    /// Set every part at once.
    pub fn with_config(self, cfg: ScoringCfg) -> Self {
        self.with_accuracy(cfg.accuracy)
            .with_window(cfg.window)
            .with_freshness(cfg.freshness)
            .with_availability(cfg.availability)
            .with_weights(cfg.weights)
            .with_fleet(cfg.fleet)
    }
    pub fn with_accuracy(mut self, c: AccuracyCfg) -> Self {
        self.accuracy = Some(c);
        self
    }
    pub fn with_window(mut self, c: WindowCfg) -> Self {
        self.window = Some(c);
        self
    }
    pub fn with_freshness(mut self, c: FreshnessCfg) -> Self {
        self.freshness = Some(c);
        self
    }
    pub fn with_availability(mut self, c: AvailabilityCfg) -> Self {
        self.availability = Some(c);
        self
    }
    pub fn with_weights(mut self, c: WeightsCfg) -> Self {
        self.weights = Some(c);
        self
    }
    pub fn with_fleet(mut self, c: FleetCfg) -> Self {
        self.fleet = Some(c);
        self
    }
    pub fn with_expected_hz(mut self, hz: f64) -> Self {
        self.expected_hz = Some(hz);
        self
    }

    pub fn build(self) -> Result<ScoringEngine> {
        let cfg = ScoringCfg {
            accuracy: self.accuracy.unwrap_or_default(),
            window: self.window.unwrap_or_default(),
            freshness: self.freshness.unwrap_or_default(),
            availability: self.availability.unwrap_or_default(),
            weights: self.weights.unwrap_or_default(),
            fleet: self.fleet.unwrap_or_default(),
        };
        let expected_hz = self.expected_hz.unwrap_or(DEFAULT_EXPECTED_HZ);
        validate(&cfg, expected_hz)?;
        Ok(ScoringEngine { cfg, expected_hz })
    }
}

fn invalid(msg: &'static str) -> Result<()> {
    Err(eyre::Report::new(BuildError::InvalidConfig(msg)))
}

fn is_ratio(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

/// Runtime config validation. Covers the same ranges as
/// `fleet_config::Config::validate`; NaN fails every check.
fn validate(cfg: &ScoringCfg, expected_hz: f64) -> Result<()> {
    let a = &cfg.accuracy;
    if !(a.green_m.is_finite() && a.yellow_m.is_finite() && a.red_m.is_finite()) {
        return invalid("accuracy thresholds must be finite");
    }
    if !(a.green_m < a.yellow_m && a.yellow_m < a.red_m) {
        return invalid("accuracy thresholds must satisfy green < yellow < red");
    }
    if !(a.moderate_kmh.is_finite() && a.fast_kmh.is_finite()) {
        return invalid("speed bands must be finite");
    }
    if !(0.0 <= a.moderate_kmh && a.moderate_kmh < a.fast_kmh) {
        return invalid("speed bands must satisfy 0 <= moderate_kmh < fast_kmh");
    }
    if !(a.moderate_boost_m.is_finite() && a.fast_boost_m.is_finite()) {
        return invalid("speed boosts must be finite");
    }
    if !(0.0 <= a.moderate_boost_m && a.moderate_boost_m <= a.fast_boost_m) {
        return invalid("speed boosts must satisfy 0 <= moderate <= fast");
    }

    let w = &cfg.window;
    if w.base_ms == 0 {
        return invalid("window base_ms must be >= 1");
    }
    if w.max_ms < w.base_ms {
        return invalid("window max_ms must be >= base_ms");
    }
    if w.min_samples == 0 {
        return invalid("window min_samples must be >= 1");
    }
    if w.silent_scale == 0 {
        return invalid("window silent_scale must be >= 1");
    }
    if !(w.trim_ratio >= 0.0 && w.trim_ratio < 0.5) {
        return invalid("trim_ratio must be in [0.0, 0.5)");
    }

    let f = &cfg.freshness;
    if !(0.0 <= f.fresh_s && f.fresh_s < f.stale_s && f.stale_s.is_finite()) {
        return invalid("freshness must satisfy 0 <= fresh_s < stale_s");
    }
    let v = &cfg.availability;
    if !(0.0 <= v.floor_ratio && v.floor_ratio < v.full_ratio && v.full_ratio.is_finite()) {
        return invalid("availability must satisfy 0 <= floor_ratio < full_ratio");
    }

    let wt = &cfg.weights;
    let weights = [wt.accuracy, wt.freshness, wt.availability];
    if weights.iter().any(|x| !(x.is_finite() && *x >= 0.0)) {
        return invalid("weights must be finite and >= 0");
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return invalid("weights must not all be zero");
    }

    let fl = &cfg.fleet;
    if !(0.0 <= fl.red_below && fl.red_below <= fl.yellow_below && fl.yellow_below <= 100.0) {
        return invalid("fleet bands must satisfy 0 <= red_below <= yellow_below <= 100");
    }
    if !(is_ratio(fl.good_max_red) && is_ratio(fl.good_max_yellow) && is_ratio(fl.poor_min_red)) {
        return invalid("fleet ratio thresholds must be in [0.0, 1.0]");
    }
    if !((0.0..=100.0).contains(&fl.good_min_p50) && (0.0..=100.0).contains(&fl.poor_below_p50)) {
        return invalid("fleet p50 thresholds must be in [0, 100]");
    }

    if !expected_hz.is_finite() {
        return invalid("expected_hz must be finite");
    }
    Ok(())
}
