//! Human-readable error descriptions and structured JSON error formatting.

use fleet_core::error::{BuildError, FleetError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid scoring configuration ({msg}).\nLikely causes: An out-of-range override such as --expected-hz.\nHow to fix: Pass a finite value, or drop the override and use the config file."
        );
    }

    if let Some(fe) = err.downcast_ref::<FleetError>() {
        return match fe {
            FleetError::Config(msg) => format!(
                "What happened: The config file was rejected ({msg}).\nLikely causes: Thresholds out of order or values out of range in the TOML.\nHow to fix: Edit the config file, then rerun `fleet check-config`."
            ),
            FleetError::Source(msg) => format!(
                "What happened: The telemetry snapshot could not be read ({msg}).\nLikely causes: The source is unavailable.\nHow to fix: Re-run with --log-level=debug for details."
            ),
            FleetError::Input(msg) => humanize_input(msg),
        };
    }

    // String-based heuristics for errors raised before the engine exists
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("read config") {
        return format!(
            "What happened: The config file could not be read ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Check the path, or omit --config to use the stock constants."
        );
    }
    if lower.starts_with("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this tool ({msg}).\nLikely causes: A typo in a key, or a string where a number is expected.\nHow to fix: Compare the file against the documented [accuracy] [window] [freshness] [availability] [weights] [fleet] [logging] sections."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

fn humanize_input(msg: &str) -> String {
    let lower = msg.to_ascii_lowercase();
    if lower.contains("samples csv must have headers") {
        return "Invalid headers in samples CSV. Expected 'device_id,timestamp_ms,accuracy_m,speed_kmh' (or speed_mps).".to_string();
    }
    if lower.contains("invalid csv row") {
        return format!(
            "What happened: A samples CSV row could not be parsed ({msg}).\nLikely causes: Wrong column count, a non-numeric timestamp or accuracy, or an empty device_id.\nHow to fix: Fix the named line; leave accuracy_m or speed empty when unknown."
        );
    }
    if lower.contains("open samples csv") {
        return format!(
            "What happened: The samples CSV could not be opened ({msg}).\nLikely causes: Wrong --samples path or missing permissions.\nHow to fix: Check the path and rerun."
        );
    }
    format!(
        "What happened: Invalid input ({msg}).\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug for details."
    )
}

/// Stable name for the error kind carried in JSON error output.
pub fn error_reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<FleetError>() {
        Some(FleetError::Config(_)) => "Config",
        Some(FleetError::Source(_)) => "Source",
        Some(FleetError::Input(_)) => "Input",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({ "reason": error_reason_name(err), "message": humanize(err) }).to_string()
}
