//! Telemetry ingress seam.

use crate::sample::Device;

/// Supplies a read-only snapshot of every device and its samples.
///
/// The engine never mutates or retains what it receives; retention and
/// transport belong to the implementor.
pub trait TelemetrySource {
    fn snapshot(&mut self) -> Result<Vec<Device>, Box<dyn std::error::Error + Send + Sync>>;
}

/// A source that hands out clones of a fixed device list.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    devices: Vec<Device>,
}

impl InMemorySource {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}

impl TelemetrySource for InMemorySource {
    fn snapshot(&mut self) -> Result<Vec<Device>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.devices.clone())
    }
}
