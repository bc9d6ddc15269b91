//! Health and metric records from the actuator API.
//!
//! These are mostly passed through untouched. The one transformation is
//! [`SystemHealth::format_disk_space`], which turns the free-space byte count
//! into a display string exactly once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::bytes::{format_bytes, ByteFormatError};

/// Severity used for colouring health and trace rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "OK",
            HealthStatus::Warning => "WARN",
            HealthStatus::Critical => "CRIT",
        }
    }
}

/// Response body of a `/metrics/{name}` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_unit: Option<String>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub available_tags: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub statistic: String,
    pub value: f64,
}

impl Metric {
    /// Value of the first measurement, which is all single-value gauges carry.
    pub fn first_value(&self) -> Option<f64> {
        self.measurements.first().map(|m| m.value)
    }

    /// Value for a named statistic such as `"VALUE"` or `"COUNT"`.
    pub fn value_of(&self, statistic: &str) -> Option<f64> {
        self.measurements
            .iter()
            .find(|m| m.statistic.eq_ignore_ascii_case(statistic))
            .map(|m| m.value)
    }
}

/// `/metrics/system.cpu.count` response.
pub type SystemCpu = Metric;

/// `/health` response.
///
/// Only the fields the dashboard reads are typed; everything else is kept in
/// the flattened maps so the record can be exported as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub components: Components,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, rename = "diskSpace", skip_serializing_if = "Option::is_none")]
    pub disk_space: Option<DiskSpace>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskSpace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub details: DiskDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<DiskFree>,
    /// `total`, `threshold`, `path`, `exists` and anything else.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Free disk space, either as received or after formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiskFree {
    Bytes(f64),
    Formatted(String),
}

impl DiskFree {
    pub fn is_formatted(&self) -> bool {
        matches!(self, DiskFree::Formatted(_))
    }
}

impl SystemHealth {
    /// Map the reported status string to a display severity.
    pub fn level(&self) -> HealthStatus {
        match self.status.as_deref() {
            Some("UP") => HealthStatus::Healthy,
            Some("DOWN") | Some("OUT_OF_SERVICE") => HealthStatus::Critical,
            _ => HealthStatus::Warning,
        }
    }

    pub fn disk_free(&self) -> Option<&DiskFree> {
        self.components.disk_space.as_ref()?.details.free.as_ref()
    }

    /// Replace the free-space byte count with its formatted string.
    ///
    /// Returns `Ok(true)` if the field was formatted, `Ok(false)` if there was
    /// nothing to do (absent, or already formatted). On error the byte count
    /// is left in place.
    pub fn format_disk_space(&mut self) -> Result<bool, ByteFormatError> {
        let Some(disk) = self.components.disk_space.as_mut() else {
            return Ok(false);
        };
        let Some(DiskFree::Bytes(bytes)) = disk.details.free else {
            return Ok(false);
        };
        disk.details.free = Some(DiskFree::Formatted(format_bytes(bytes)?));
        Ok(true)
    }
}
