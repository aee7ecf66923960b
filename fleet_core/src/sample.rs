//! Telemetry samples and devices as seen by the scoring engine.

/// Factor converting metres per second to kilometres per hour.
pub const KMH_PER_MPS: f64 = 3.6;

/// Keep a value only when it is present and finite.
///
/// NaN and ±∞ become `None`, so downstream stages only ever see real numbers.
#[inline]
pub fn finite_or_none(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite())
}

/// Convert a device-reported speed in m/s to km/h.
#[inline]
pub fn kmh_from_mps(mps: f64) -> f64 {
    mps * KMH_PER_MPS
}

/// One position fix from one device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time the fix was produced on the device (epoch ms).
    pub timestamp_ms: i64,
    /// Horizontal error radius in metres.
    pub accuracy_m: Option<f64>,
    /// Ground speed in km/h.
    pub speed_kmh: Option<f64>,
}

impl Sample {
    /// Build a sample, dropping non-finite accuracy and speed values.
    pub fn new(timestamp_ms: i64, accuracy_m: Option<f64>, speed_kmh: Option<f64>) -> Self {
        Self {
            timestamp_ms,
            accuracy_m: finite_or_none(accuracy_m),
            speed_kmh: finite_or_none(speed_kmh),
        }
    }

    /// Sample with an accuracy and no speed.
    pub fn fix(timestamp_ms: i64, accuracy_m: f64) -> Self {
        Self::new(timestamp_ms, Some(accuracy_m), None)
    }

    /// Reported speed, or 0 when the device did not report one.
    #[inline]
    pub fn speed_or_zero(&self) -> f64 {
        self.speed_kmh.unwrap_or(0.0)
    }

    /// Age relative to `now_ms` in milliseconds. Negative for future timestamps.
    #[inline]
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}

/// A device and the samples it has reported so far, in any order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Device {
    pub id: String,
    pub samples: Vec<Sample>,
}

impl Device {
    pub fn new(id: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            id: id.into(),
            samples,
        }
    }
}
