//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;

/// Guard of the non-blocking file writer; dropping it flushes pending lines.
pub static FILE_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> =
    Mutex::new(None);

#[derive(Parser, Debug)]
#[command(name = "fleet", version, about = "Fleet GNSS telemetry health scoring")]
pub struct Cli {
    /// Path to config TOML (stock scoring constants when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON, log as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Where the snapshot comes from and when it is evaluated.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Samples CSV (strict header: device_id,timestamp_ms,accuracy_m,speed_kmh|speed_mps)
    #[arg(long, value_name = "FILE")]
    pub samples: PathBuf,

    /// Evaluation instant in epoch ms (defaults to the system clock)
    #[arg(long = "now-ms", value_name = "MS", allow_negative_numbers = true)]
    pub now_ms: Option<i64>,

    /// Override the expected per-device sample rate (takes precedence over config)
    #[arg(long = "expected-hz", value_name = "HZ")]
    pub expected_hz: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a telemetry snapshot and print the fleet verdict
    Score {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Exit 3 when the fleet is Poor and 4 when it is Unknown
        #[arg(long, action = ArgAction::SetTrue)]
        strict: bool,
    },
    /// Print the per-device score breakdown
    Devices {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Validate the config file and exit
    CheckConfig,
}
