//! Configuration types for the scoring engine.
//!
//! These are the runtime configuration structs used by the scoring stages.
//! They are separate from the TOML-deserialized config in `fleet_config`.
//! Each struct's `STOCK` constant (also its `Default`) holds the standard
//! scoring constants.

/// Thresholds for the per-sample accuracy score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyCfg {
    /// Error radius (m) at or below which a fix scores 100.
    pub green_m: f64,
    /// Error radius (m) that scores exactly 60.
    pub yellow_m: f64,
    /// Error radius (m) at and beyond which a fix scores 0.
    pub red_m: f64,
    /// Speed (km/h) where the threshold boost starts.
    pub moderate_kmh: f64,
    /// Speed (km/h) at and above which the full boost applies.
    pub fast_kmh: f64,
    /// Boost (m) added to every threshold at `moderate_kmh`.
    pub moderate_boost_m: f64,
    /// Boost (m) added to every threshold at `fast_kmh` and above.
    pub fast_boost_m: f64,
}

impl AccuracyCfg {
    pub const STOCK: Self = Self {
        green_m: 12.0,
        yellow_m: 35.0,
        red_m: 80.0,
        moderate_kmh: 50.0,
        fast_kmh: 90.0,
        moderate_boost_m: 5.0,
        fast_boost_m: 10.0,
    };
}

impl Default for AccuracyCfg {
    fn default() -> Self {
        Self::STOCK
    }
}

/// Adaptive evaluation window and accuracy trimming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCfg {
    /// Base look-back window (ms).
    pub base_ms: u64,
    /// Upper bound on the widened window (ms).
    pub max_ms: u64,
    /// Samples wanted in the base window; fewer widens the window.
    pub min_samples: u32,
    /// Widening factor applied when the base window holds no sample.
    pub silent_scale: u32,
    /// Fraction of scores dropped from each end before averaging.
    pub trim_ratio: f64,
}

impl WindowCfg {
    pub const STOCK: Self = Self {
        base_ms: 45_000,
        max_ms: 180_000,
        min_samples: 5,
        silent_scale: 4,
        trim_ratio: 0.10,
    };
}

impl Default for WindowCfg {
    fn default() -> Self {
        Self::STOCK
    }
}

/// Staleness decay of the newest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshnessCfg {
    pub fresh_s: f64,
    pub stale_s: f64,
}

impl FreshnessCfg {
    pub const STOCK: Self = Self {
        fresh_s: 10.0,
        stale_s: 60.0,
    };
}

impl Default for FreshnessCfg {
    fn default() -> Self {
        Self::STOCK
    }
}

/// Band on the actual/expected sample-rate ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailabilityCfg {
    pub floor_ratio: f64,
    pub full_ratio: f64,
}

impl AvailabilityCfg {
    pub const STOCK: Self = Self {
        floor_ratio: 0.3,
        full_ratio: 0.8,
    };
}

impl Default for AvailabilityCfg {
    fn default() -> Self {
        Self::STOCK
    }
}

/// Weights of the composite device score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightsCfg {
    pub accuracy: f64,
    pub freshness: f64,
    pub availability: f64,
}

impl WeightsCfg {
    pub const STOCK: Self = Self {
        accuracy: 0.85,
        freshness: 0.10,
        availability: 0.05,
    };
}

impl Default for WeightsCfg {
    fn default() -> Self {
        Self::STOCK
    }
}

/// Fleet banding and label thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetCfg {
    /// Scores below this are red.
    pub red_below: f64,
    /// Scores in `[red_below, yellow_below)` are yellow.
    pub yellow_below: f64,
    pub good_min_p50: f64,
    pub good_max_red: f64,
    pub good_max_yellow: f64,
    pub poor_below_p50: f64,
    pub poor_min_red: f64,
}

impl FleetCfg {
    pub const STOCK: Self = Self {
        red_below: 40.0,
        yellow_below: 70.0,
        good_min_p50: 80.0,
        good_max_red: 0.05,
        good_max_yellow: 0.20,
        poor_below_p50: 50.0,
        poor_min_red: 0.15,
    };
}

impl Default for FleetCfg {
    fn default() -> Self {
        Self::STOCK
    }
}

/// Everything the device and fleet stages need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringCfg {
    pub accuracy: AccuracyCfg,
    pub window: WindowCfg,
    pub freshness: FreshnessCfg,
    pub availability: AvailabilityCfg,
    pub weights: WeightsCfg,
    pub fleet: FleetCfg,
}

impl ScoringCfg {
    pub const STOCK: Self = Self {
        accuracy: AccuracyCfg::STOCK,
        window: WindowCfg::STOCK,
        freshness: FreshnessCfg::STOCK,
        availability: AvailabilityCfg::STOCK,
        weights: WeightsCfg::STOCK,
        fleet: FleetCfg::STOCK,
    };
}
