//! Dashboard state and the update function that feeds it.
//!
//! Every fetch result arrives as an [`Update`] and is applied independently.
//! Updates touch disjoint fields, so the order in which the four endpoints
//! answer does not matter.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde_json::json;
use tracing::{debug, warn};

use super::metrics::{SystemCpu, SystemHealth};
use super::trace::{BucketSet, Trace};
use super::uptime::{seed_from_seconds, Uptime};
use crate::source::{Endpoint, Update};

/// Everything the UI renders, rebuilt piecewise from fetch results.
#[derive(Debug, Default)]
pub struct DashboardData {
    /// Traces in the order the server returned them.
    pub traces: Vec<Trace>,
    pub buckets: BucketSet,
    /// Health record with the free disk space already formatted.
    pub health: Option<SystemHealth>,
    pub cpu: Option<SystemCpu>,
    pub uptime: Uptime,
    /// Last error per endpoint, cleared when that endpoint succeeds again.
    pub errors: BTreeMap<Endpoint, String>,
    pub last_updated: Option<Instant>,
}

impl DashboardData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one fetch result.
    ///
    /// A failed fetch only records the error; the previous value for that
    /// endpoint stays on screen.
    pub fn apply(&mut self, update: Update) {
        let endpoint = update.endpoint();

        match update {
            Update::Traces(traces) => {
                debug!(count = traces.len(), "classifying traces");
                self.buckets = BucketSet::classify(traces.iter().cloned());
                self.traces = traces;
            }
            Update::Health(mut health) => {
                if let Err(e) = health.format_disk_space() {
                    warn!(error = %e, "could not format free disk space");
                }
                self.health = Some(health);
            }
            Update::Cpu(cpu) => {
                self.cpu = Some(cpu);
            }
            Update::Uptime(metric) => {
                let Some(value) = metric.first_value() else {
                    warn!("uptime response had no measurements");
                    self.errors.insert(endpoint, "No uptime measurement".to_string());
                    return;
                };
                self.uptime.restart(seed_from_seconds(value));
            }
            Update::Failed { error, .. } => {
                warn!(%endpoint, %error, "fetch failed");
                self.errors.insert(endpoint, error);
                return;
            }
        }

        self.errors.remove(&endpoint);
        self.last_updated = Some(Instant::now());
    }

    /// Number of processors reported by the CPU metric.
    pub fn cpu_count(&self) -> Option<f64> {
        self.cpu.as_ref()?.first_value()
    }

    /// Build the JSON document written by [`DashboardData::write_export`].
    pub fn export_json(&self) -> serde_json::Value {
        let buckets: serde_json::Map<String, serde_json::Value> = self
            .buckets
            .counts()
            .iter()
            .map(|(class, count)| (class.label().to_string(), json!(count)))
            .collect();

        let errors: serde_json::Map<String, serde_json::Value> = self
            .errors
            .iter()
            .map(|(endpoint, error)| (endpoint.label().to_string(), json!(error)))
            .collect();

        json!({
            "total_traces": self.traces.len(),
            "buckets": buckets,
            "uptime": {
                "seconds": self.uptime.seconds(),
                "formatted": self.uptime.formatted(),
            },
            "health": self.health,
            "cpu": self.cpu,
            "errors": errors,
        })
    }

    /// Write the current state to a pretty-printed JSON file.
    pub fn write_export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.export_json())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::metrics::{DiskFree, Measurement, Metric};
    use crate::data::trace::{StatusClass, TraceResponse};

    fn trace(status: i64) -> Trace {
        Trace {
            response: TraceResponse {
                status: Some(status),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn metric(value: f64) -> Metric {
        Metric {
            name: "process.uptime".to_string(),
            measurements: vec![Measurement {
                statistic: "VALUE".to_string(),
                value,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_traces_rebuilds_buckets() {
        let mut data = DashboardData::new();
        data.apply(Update::Traces(vec![trace(200), trace(404), trace(200)]));
        assert_eq!(data.traces.len(), 3);
        assert_eq!(data.buckets.bucket(StatusClass::Ok).len(), 2);

        // Full rebuild, not a merge.
        data.apply(Update::Traces(vec![trace(500)]));
        assert_eq!(data.traces.len(), 1);
        assert!(data.buckets.bucket(StatusClass::Ok).is_empty());
        assert_eq!(data.buckets.bucket(StatusClass::ServerError).len(), 1);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_state() {
        let mut data = DashboardData::new();
        data.apply(Update::Traces(vec![trace(200)]));
        data.apply(Update::Failed {
            endpoint: Endpoint::Traces,
            error: "Connection failed: refused".to_string(),
        });

        assert_eq!(data.traces.len(), 1);
        assert_eq!(
            data.errors.get(&Endpoint::Traces).map(String::as_str),
            Some("Connection failed: refused")
        );

        data.apply(Update::Traces(vec![]));
        assert!(data.errors.is_empty());
        assert!(data.buckets.is_empty());
    }

    #[test]
    fn test_apply_health_formats_disk_space() {
        let json = r#"{"status":"UP","components":{"diskSpace":{"details":{"free":1024}}}}"#;
        let health: SystemHealth = serde_json::from_str(json).unwrap();

        let mut data = DashboardData::new();
        data.apply(Update::Health(health));
        let stored = data.health.as_ref().unwrap();
        assert_eq!(stored.disk_free(), Some(&DiskFree::Formatted("1 KB".to_string())));

        // Re-applying an already formatted record leaves it alone.
        let again = stored.clone();
        data.apply(Update::Health(again));
        assert_eq!(
            data.health.as_ref().unwrap().disk_free(),
            Some(&DiskFree::Formatted("1 KB".to_string()))
        );
    }

    #[test]
    fn test_apply_cpu() {
        let mut data = DashboardData::new();
        assert_eq!(data.cpu_count(), None);
        data.apply(Update::Cpu(metric(8.0)));
        assert_eq!(data.cpu_count(), Some(8.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_uptime_reseeds_ticker() {
        let mut data = DashboardData::new();
        data.apply(Update::Uptime(metric(3725.4)));
        assert_eq!(data.uptime.seconds(), 3725);
        assert_eq!(data.uptime.formatted(), "01h 02m 05s");

        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
        assert_eq!(data.uptime.seconds(), 3727);

        data.apply(Update::Uptime(metric(10.0)));
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert_eq!(data.uptime.seconds(), 11);
    }

    #[test]
    fn test_uptime_without_measurements_is_an_error() {
        let mut data = DashboardData::new();
        data.apply(Update::Uptime(Metric::default()));
        assert!(data.errors.contains_key(&Endpoint::Uptime));
        assert!(!data.uptime.is_running());
    }

    #[test]
    fn test_write_export() {
        let mut data = DashboardData::new();
        data.apply(Update::Traces(vec![trace(200), trace(503)]));
        data.apply(Update::Cpu(metric(4.0)));
        data.apply(Update::Failed {
            endpoint: Endpoint::Health,
            error: "Request timed out".to_string(),
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        data.write_export(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["total_traces"], 2);
        assert_eq!(written["buckets"]["200"], 1);
        assert_eq!(written["buckets"]["Other"], 1);
        assert_eq!(written["uptime"]["formatted"], "00h 00m 00s");
        assert_eq!(written["cpu"]["measurements"][0]["value"], 4.0);
        assert!(written["health"].is_null());
        assert_eq!(written["errors"]["health"], "Request timed out");
    }
}
