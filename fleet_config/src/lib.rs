#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and sample CSV parsing for the fleet scoring engine.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; defaults reproduce the stock scoring constants.
//! - The sample CSV loader enforces headers and reports bad rows by line number.
use serde::Deserialize;

/// Speed column units accepted by the sample CSV loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mps,
}

/// One parsed CSV row. Speed is in the table's `unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub device_id: String,
    pub timestamp_ms: i64,
    pub accuracy_m: Option<f64>,
    pub speed: Option<f64>,
}

/// Sample CSV contents together with the speed unit announced by its header.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub unit: SpeedUnit,
    pub rows: Vec<SampleRow>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccuracyCfg {
    /// Error radius (m) at or below which a fix scores 100
    pub green_m: f64,
    /// Error radius (m) that scores 60
    pub yellow_m: f64,
    /// Error radius (m) above which a fix scores 0
    pub red_m: f64,
    /// Speed (km/h) where threshold relaxation starts
    pub moderate_kmh: f64,
    /// Speed (km/h) at and above which the full boost applies
    pub fast_kmh: f64,
    pub moderate_boost_m: f64,
    pub fast_boost_m: f64,
}

impl Default for AccuracyCfg {
    fn default() -> Self {
        Self {
            green_m: 12.0,
            yellow_m: 35.0,
            red_m: 80.0,
            moderate_kmh: 50.0,
            fast_kmh: 90.0,
            moderate_boost_m: 5.0,
            fast_boost_m: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowCfg {
    pub base_ms: u64,
    pub max_ms: u64,
    /// Samples wanted inside the base window before widening stops
    pub min_samples: u32,
    /// Widening factor used when the base window is empty
    pub silent_scale: u32,
    /// Fraction trimmed from each end before averaging accuracy scores
    pub trim_ratio: f64,
}

impl Default for WindowCfg {
    fn default() -> Self {
        Self {
            base_ms: 45_000,
            max_ms: 180_000,
            min_samples: 5,
            silent_scale: 4,
            trim_ratio: 0.10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FreshnessCfg {
    pub fresh_s: f64,
    pub stale_s: f64,
}

impl Default for FreshnessCfg {
    fn default() -> Self {
        Self {
            fresh_s: 10.0,
            stale_s: 60.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AvailabilityCfg {
    /// Expected per-device sample rate in Hz
    pub expected_hz: f64,
    /// actual/expected ratio at or below which availability is 0
    pub floor_ratio: f64,
    /// actual/expected ratio at or above which availability is 100
    pub full_ratio: f64,
}

impl Default for AvailabilityCfg {
    fn default() -> Self {
        Self {
            expected_hz: 1.0,
            floor_ratio: 0.3,
            full_ratio: 0.8,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WeightsCfg {
    pub accuracy: f64,
    pub freshness: f64,
    pub availability: f64,
}

impl Default for WeightsCfg {
    fn default() -> Self {
        Self {
            accuracy: 0.85,
            freshness: 0.10,
            availability: 0.05,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FleetCfg {
    /// Device scores below this count as red
    pub red_below: f64,
    /// Device scores in [red_below, yellow_below) count as yellow
    pub yellow_below: f64,
    pub good_min_p50: f64,
    pub good_max_red: f64,
    pub good_max_yellow: f64,
    pub poor_below_p50: f64,
    pub poor_min_red: f64,
}

impl Default for FleetCfg {
    fn default() -> Self {
        Self {
            red_below: 40.0,
            yellow_below: 70.0,
            good_min_p50: 80.0,
            good_max_red: 0.05,
            good_max_yellow: 0.20,
            poor_below_p50: 50.0,
            poor_min_red: 0.15,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub accuracy: AccuracyCfg,
    pub window: WindowCfg,
    pub freshness: FreshnessCfg,
    pub availability: AvailabilityCfg,
    pub weights: WeightsCfg,
    pub fleet: FleetCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn is_ratio(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Accuracy
        let a = &self.accuracy;
        if !(a.green_m.is_finite() && a.yellow_m.is_finite() && a.red_m.is_finite()) {
            eyre::bail!("accuracy thresholds must be finite");
        }
        if a.green_m < 0.0 {
            eyre::bail!("accuracy.green_m must be >= 0");
        }
        if !(a.green_m < a.yellow_m && a.yellow_m < a.red_m) {
            eyre::bail!("accuracy thresholds must satisfy green_m < yellow_m < red_m");
        }
        if !(a.moderate_kmh.is_finite() && a.fast_kmh.is_finite()) {
            eyre::bail!("accuracy.moderate_kmh and accuracy.fast_kmh must be finite");
        }
        if !(0.0 <= a.moderate_kmh && a.moderate_kmh < a.fast_kmh) {
            eyre::bail!("accuracy.moderate_kmh must be >= 0 and < accuracy.fast_kmh");
        }
        if !(a.moderate_boost_m.is_finite() && a.fast_boost_m.is_finite()) {
            eyre::bail!("accuracy boosts must be finite");
        }
        if !(0.0 <= a.moderate_boost_m && a.moderate_boost_m <= a.fast_boost_m) {
            eyre::bail!("accuracy boosts must satisfy 0 <= moderate_boost_m <= fast_boost_m");
        }

        // Window
        let w = &self.window;
        if w.base_ms == 0 {
            eyre::bail!("window.base_ms must be >= 1");
        }
        if w.max_ms < w.base_ms {
            eyre::bail!("window.max_ms must be >= window.base_ms");
        }
        if w.max_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("window.max_ms is unreasonably large (>24h)");
        }
        if w.min_samples == 0 {
            eyre::bail!("window.min_samples must be >= 1");
        }
        if w.silent_scale == 0 {
            eyre::bail!("window.silent_scale must be >= 1");
        }
        if !(w.trim_ratio >= 0.0 && w.trim_ratio < 0.5) {
            eyre::bail!("window.trim_ratio must be in [0.0, 0.5)");
        }

        // Freshness
        let f = &self.freshness;
        if !(f.fresh_s >= 0.0 && f.fresh_s < f.stale_s && f.stale_s.is_finite()) {
            eyre::bail!("freshness must satisfy 0 <= fresh_s < stale_s");
        }

        // Availability
        let v = &self.availability;
        if !(v.expected_hz.is_finite() && v.expected_hz > 0.0) {
            eyre::bail!("availability.expected_hz must be > 0");
        }
        if !(v.floor_ratio >= 0.0 && v.floor_ratio < v.full_ratio && v.full_ratio.is_finite()) {
            eyre::bail!("availability must satisfy 0 <= floor_ratio < full_ratio");
        }

        // Weights
        let wt = &self.weights;
        for (name, x) in [
            ("accuracy", wt.accuracy),
            ("freshness", wt.freshness),
            ("availability", wt.availability),
        ] {
            if !(x.is_finite() && x >= 0.0) {
                eyre::bail!("weights.{name} must be a finite value >= 0");
            }
        }
        if wt.accuracy + wt.freshness + wt.availability <= 0.0 {
            eyre::bail!("weights must not all be zero");
        }

        // Fleet
        let fl = &self.fleet;
        if !(fl.red_below >= 0.0 && fl.red_below <= fl.yellow_below && fl.yellow_below <= 100.0) {
            eyre::bail!("fleet bands must satisfy 0 <= red_below <= yellow_below <= 100");
        }
        if !(is_ratio(fl.good_max_red) && is_ratio(fl.good_max_yellow) && is_ratio(fl.poor_min_red))
        {
            eyre::bail!("fleet ratio thresholds must be in [0.0, 1.0]");
        }
        if !(0.0..=100.0).contains(&fl.good_min_p50) || !(0.0..=100.0).contains(&fl.poor_below_p50)
        {
            eyre::bail!("fleet p50 thresholds must be in [0, 100]");
        }

        // Logging
        if let Some(level) = self.logging.level.as_deref()
            && !matches!(level, "error" | "warn" | "info" | "debug" | "trace")
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace, got {level:?}");
        }
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}

const HEADERS_KMH: [&str; 4] = ["device_id", "timestamp_ms", "accuracy_m", "speed_kmh"];
const HEADERS_MPS: [&str; 4] = ["device_id", "timestamp_ms", "accuracy_m", "speed_mps"];

/// Load a telemetry snapshot from CSV.
///
/// Expected headers (speed column selects the unit):
/// device_id,timestamp_ms,accuracy_m,speed_kmh
/// device_id,timestamp_ms,accuracy_m,speed_mps
///
/// Example:
/// device_id,timestamp_ms,accuracy_m,speed_kmh
/// bus-12,1700000000000,8.5,42.0
/// bus-12,1700000001000,,
pub fn load_samples_csv(path: &std::path::Path) -> eyre::Result<SampleTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open samples CSV {:?}: {}", path, e))?;
    read_samples(rdr).map_err(|e| eyre::eyre!("samples CSV {:?}: {}", path, e))
}

/// Same as `load_samples_csv`, reading from any reader (stdin, in-memory text).
pub fn parse_samples_csv<R: std::io::Read>(reader: R) -> eyre::Result<SampleTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_samples(rdr)
}

fn read_samples<R: std::io::Read>(mut rdr: csv::Reader<R>) -> eyre::Result<SampleTable> {
    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers: {}", e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    let unit = if actual == HEADERS_KMH {
        SpeedUnit::Kmh
    } else if actual == HEADERS_MPS {
        SpeedUnit::Mps
    } else {
        eyre::bail!(
            "samples CSV must have headers 'device_id,timestamp_ms,accuracy_m,speed_kmh' (or speed_mps), got: {}",
            actual.join(",")
        );
    };

    let mut rows = Vec::new();
    for (idx, rec) in rdr
        .deserialize::<(String, i64, Option<f64>, Option<f64>)>()
        .enumerate()
    {
        match rec {
            Ok((device_id, timestamp_ms, accuracy_m, speed)) => {
                if device_id.is_empty() {
                    eyre::bail!("invalid CSV row {}: empty device_id", idx + 2);
                }
                rows.push(SampleRow {
                    device_id,
                    timestamp_ms,
                    accuracy_m,
                    speed,
                });
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    Ok(SampleTable { unit, rows })
}
