mod cli;
mod error_fmt;
mod logging;
mod report;

use std::fs;
use std::path::Path;

use clap::Parser;
use eyre::Result;
use fleet_core::conversions::load_devices_csv;
use fleet_core::{InMemorySource, ScoringEngine};
use fleet_traits::{Clock, FixedClock, SystemClock};

use crate::cli::{Cli, Commands, SnapshotArgs};
use crate::error_fmt::{format_error_json, humanize};

fn main() {
    // Install color-eyre for nicer panic reports; errors are formatted below.
    let _ = color_eyre::install();
    // clap exits with code 2 on usage errors
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                eprintln!("{}", format_error_json(&e));
            } else {
                eprintln!("{}", humanize(&e));
            }
            1
        }
    };
    logging::shutdown();
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    let engine = ScoringEngine::from_config(&config)?;
    logging::init(&cli.log_level, cli.json, &config.logging)?;

    match &cli.cmd {
        Commands::CheckConfig => {
            tracing::info!(expected_hz = engine.expected_hz(), "config validated");
            if cli.json {
                println!("{}", serde_json::json!({ "config": "ok" }));
            } else {
                println!("config ok");
            }
            Ok(0)
        }
        Commands::Score { snapshot, strict } => {
            let (engine, now_ms, devices) = prepare(engine, snapshot)?;
            let mut source = InMemorySource::new(devices);
            let verdict = engine.evaluate(&mut source, &FixedClock::new(now_ms))?;
            if cli.json {
                println!("{}", report::verdict_json(&verdict, now_ms));
            } else {
                println!("{}", report::verdict_text(&verdict));
            }
            Ok(if *strict {
                report::strict_exit_code(verdict.label)
            } else {
                0
            })
        }
        Commands::Devices { snapshot } => {
            let (engine, now_ms, devices) = prepare(engine, snapshot)?;
            for r in engine.device_reports(&devices, now_ms) {
                if cli.json {
                    println!("{}", report::device_json(&r));
                } else {
                    println!("{}", report::device_text(&r));
                }
            }
            Ok(0)
        }
    }
}

/// Missing `--config` means stock constants.
fn load_config(path: Option<&Path>) -> Result<fleet_config::Config> {
    let Some(path) = path else {
        return Ok(fleet_config::Config::default());
    };
    let text =
        fs::read_to_string(path).map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    fleet_config::load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

/// Apply the rate override, pick the evaluation instant, and load the snapshot.
fn prepare(
    engine: ScoringEngine,
    args: &SnapshotArgs,
) -> Result<(ScoringEngine, i64, Vec<fleet_core::Device>)> {
    let engine = match args.expected_hz {
        Some(hz) => ScoringEngine::builder()
            .with_config(*engine.cfg())
            .with_expected_hz(hz)
            .build()?,
        None => engine,
    };
    let now_ms = args.now_ms.unwrap_or_else(|| SystemClock::new().now_ms());
    let devices = load_devices_csv(&args.samples)?;
    tracing::debug!(devices = devices.len(), now_ms, "snapshot ready");
    Ok((engine, now_ms, devices))
}
