//! Text and JSON rendering of verdicts and device breakdowns.

use fleet_core::{DeviceReport, FleetLabel, FleetVerdict};
use serde_json::json;

/// Exit code for `score --strict`: Poor is 3, Unknown is 4, otherwise 0.
pub fn strict_exit_code(label: FleetLabel) -> i32 {
    match label {
        FleetLabel::Poor => 3,
        FleetLabel::Unknown => 4,
        FleetLabel::Good | FleetLabel::Moderate => 0,
    }
}

pub fn verdict_json(v: &FleetVerdict, now_ms: i64) -> String {
    json!({
        "p50": v.p50,
        "red_ratio": v.red_ratio,
        "yellow_ratio": v.yellow_ratio,
        "label": v.label.as_str(),
        "scored": v.scored,
        "unscored": v.unscored,
        "now_ms": now_ms,
    })
    .to_string()
}

pub fn verdict_text(v: &FleetVerdict) -> String {
    format!(
        "fleet: {}\np50: {:.1}\nred: {:.1}%  yellow: {:.1}%\ndevices: {} scored, {} without data",
        v.label,
        v.p50,
        v.red_ratio * 100.0,
        v.yellow_ratio * 100.0,
        v.scored,
        v.unscored
    )
}

pub fn device_json(r: &DeviceReport) -> String {
    match &r.breakdown {
        Some(b) => json!({
            "id": r.id,
            "score": b.score,
            "accuracy": b.accuracy,
            "freshness": b.freshness,
            "availability": b.availability,
            "availability_eff": b.availability_eff,
            "window_ms": b.window.width_ms,
            "count_base": b.window.count_base,
            "window_count": b.window_count,
            "age_s": b.age_s,
        }),
        None => json!({ "id": r.id, "score": null }),
    }
    .to_string()
}

pub fn device_text(r: &DeviceReport) -> String {
    match &r.breakdown {
        Some(b) => format!(
            "{}: score={:.1} accuracy={:.1} freshness={:.1} availability={:.1} window={}s samples={} age={:.1}s",
            r.id,
            b.score,
            b.accuracy,
            b.freshness,
            b.availability_eff,
            b.window.width_ms / 1000,
            b.window_count,
            b.age_s
        ),
        None => format!("{}: no data", r.id),
    }
}
