//! `From` implementations bridging `fleet_config` types to `fleet_core` types,
//! plus grouping of loaded sample tables into devices.

use std::collections::BTreeMap;
use std::path::Path;

use fleet_config::{SampleTable, SpeedUnit};

use crate::config::{
    AccuracyCfg, AvailabilityCfg, FleetCfg, FreshnessCfg, ScoringCfg, WeightsCfg, WindowCfg,
};
use crate::error::{FleetError, Result};
use crate::sample::{Device, Sample, kmh_from_mps};

// ── AccuracyCfg ──────────────────────────────────────────────────────────────

impl From<&fleet_config::AccuracyCfg> for AccuracyCfg {
    fn from(c: &fleet_config::AccuracyCfg) -> Self {
        Self {
            green_m: c.green_m,
            yellow_m: c.yellow_m,
            red_m: c.red_m,
            moderate_kmh: c.moderate_kmh,
            fast_kmh: c.fast_kmh,
            moderate_boost_m: c.moderate_boost_m,
            fast_boost_m: c.fast_boost_m,
        }
    }
}

// ── WindowCfg ────────────────────────────────────────────────────────────────

impl From<&fleet_config::WindowCfg> for WindowCfg {
    fn from(c: &fleet_config::WindowCfg) -> Self {
        Self {
            base_ms: c.base_ms,
            max_ms: c.max_ms,
            min_samples: c.min_samples,
            silent_scale: c.silent_scale,
            trim_ratio: c.trim_ratio,
        }
    }
}

// ── FreshnessCfg ─────────────────────────────────────────────────────────────

impl From<&fleet_config::FreshnessCfg> for FreshnessCfg {
    fn from(c: &fleet_config::FreshnessCfg) -> Self {
        Self {
            fresh_s: c.fresh_s,
            stale_s: c.stale_s,
        }
    }
}

// ── AvailabilityCfg ──────────────────────────────────────────────────────────

impl From<&fleet_config::AvailabilityCfg> for AvailabilityCfg {
    fn from(c: &fleet_config::AvailabilityCfg) -> Self {
        Self {
            floor_ratio: c.floor_ratio,
            full_ratio: c.full_ratio,
        }
    }
}

// ── WeightsCfg ───────────────────────────────────────────────────────────────

impl From<&fleet_config::WeightsCfg> for WeightsCfg {
    fn from(c: &fleet_config::WeightsCfg) -> Self {
        Self {
            accuracy: c.accuracy,
            freshness: c.freshness,
            availability: c.availability,
        }
    }
}

// ── FleetCfg ─────────────────────────────────────────────────────────────────

impl From<&fleet_config::FleetCfg> for FleetCfg {
    fn from(c: &fleet_config::FleetCfg) -> Self {
        Self {
            red_below: c.red_below,
            yellow_below: c.yellow_below,
            good_min_p50: c.good_min_p50,
            good_max_red: c.good_max_red,
            good_max_yellow: c.good_max_yellow,
            poor_below_p50: c.poor_below_p50,
            poor_min_red: c.poor_min_red,
        }
    }
}

// ── ScoringCfg ───────────────────────────────────────────────────────────────

impl From<&fleet_config::Config> for ScoringCfg {
    fn from(c: &fleet_config::Config) -> Self {
        Self {
            accuracy: (&c.accuracy).into(),
            window: (&c.window).into(),
            freshness: (&c.freshness).into(),
            availability: (&c.availability).into(),
            weights: (&c.weights).into(),
            fleet: (&c.fleet).into(),
        }
    }
}

// ── Samples ──────────────────────────────────────────────────────────────────

/// Group table rows into devices, ordered by device id.
///
/// Speeds in m/s are converted to km/h; non-finite values become absent.
pub fn devices_from_table(table: &SampleTable) -> Vec<Device> {
    let mut by_id: BTreeMap<&str, Vec<Sample>> = BTreeMap::new();
    for row in &table.rows {
        let speed_kmh = match table.unit {
            SpeedUnit::Kmh => row.speed,
            SpeedUnit::Mps => row.speed.map(kmh_from_mps),
        };
        by_id
            .entry(row.device_id.as_str())
            .or_default()
            .push(Sample::new(row.timestamp_ms, row.accuracy_m, speed_kmh));
    }
    by_id
        .into_iter()
        .map(|(id, samples)| Device::new(id, samples))
        .collect()
}

/// Load a sample CSV and group it into devices.
///
/// Any open, header or row failure surfaces as `FleetError::Input`.
pub fn load_devices_csv(path: &Path) -> Result<Vec<Device>> {
    let table = fleet_config::load_samples_csv(path)
        .map_err(|e| eyre::Report::new(FleetError::Input(e.to_string())))?;
    tracing::debug!(rows = table.rows.len(), unit = ?table.unit, "samples loaded");
    Ok(devices_from_table(&table))
}
