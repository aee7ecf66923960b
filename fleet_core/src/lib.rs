#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Fleet telemetry scoring engine.
//!
//! Turns per-device position fixes into a per-device quality score and a
//! fleet-wide verdict. Every stage is a pure function of
//! `(samples, now, expected_hz, config)`; nothing is cached between calls.
//!
//! ## Architecture
//!
//! - **Sample accuracy**: speed-relaxed piecewise-linear score (`accuracy` module)
//! - **Device aggregation**: adaptive window, trimmed mean, freshness, availability (`device` module)
//! - **Fleet aggregation**: median, red/yellow ratios, label (`fleet` module)
//! - **Configuration**: runtime config structs (`config` module)
//! - **Engine**: validated config bundle and telemetry ingress (`engine`, `source` modules)
//!
//! ## Units
//!
//! Accuracy in metres, speed in km/h, time in epoch milliseconds. Use
//! `sample::kmh_from_mps` for devices that report m/s.

pub mod accuracy;
pub mod config;
pub mod conversions;
pub mod device;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod sample;
pub mod source;
pub mod util;

pub use accuracy::{score_sample, score_sample_with};
pub use config::{
    AccuracyCfg, AvailabilityCfg, FleetCfg, FreshnessCfg, ScoringCfg, WeightsCfg, WindowCfg,
};
pub use device::{DeviceBreakdown, WindowSelection, score_device, score_device_detailed};
pub use engine::{DEFAULT_EXPECTED_HZ, DeviceReport, ScoringEngine, ScoringEngineBuilder};
pub use error::{BuildError, FleetError};
pub use fleet::{FleetLabel, FleetVerdict, score_fleet};
pub use sample::{Device, Sample};
pub use source::{InMemorySource, TelemetrySource};
