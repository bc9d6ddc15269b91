//! Snapshot file format.
//!
//! A snapshot holds one response body per endpoint, keyed the way the
//! actuator names them. Every key is optional so partial captures load.

use serde::{Deserialize, Serialize};

use super::Update;
use crate::data::{HttpTraceResponse, Metric, SystemCpu, SystemHealth};

/// Captured endpoint responses, as read by [`super::FileSource`].
///
/// ```json
/// {
///   "httptrace": { "traces": [] },
///   "health": { "status": "UP" },
///   "cpu": { "name": "system.cpu.count", "measurements": [] },
///   "uptime": { "name": "process.uptime", "measurements": [] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub httptrace: Option<HttpTraceResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<SystemHealth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<SystemCpu>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<Metric>,
}

impl DashboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.httptrace.is_none()
            && self.health.is_none()
            && self.cpu.is_none()
            && self.uptime.is_none()
    }

    /// One update per endpoint present, in endpoint order.
    pub fn into_updates(self) -> Vec<Update> {
        let mut updates = Vec::with_capacity(4);
        if let Some(body) = self.httptrace {
            updates.push(Update::Traces(body.traces));
        }
        if let Some(health) = self.health {
            updates.push(Update::Health(health));
        }
        if let Some(cpu) = self.cpu {
            updates.push(Update::Cpu(cpu));
        }
        if let Some(uptime) = self.uptime {
            updates.push(Update::Uptime(uptime));
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Endpoint;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "httptrace": {
                "traces": [
                    { "timestamp": "t1", "request": { "method": "GET", "uri": "/" }, "response": { "status": 200 } }
                ]
            },
            "health": { "status": "UP" },
            "uptime": { "name": "process.uptime", "measurements": [{ "statistic": "VALUE", "value": 12.0 }] }
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.is_empty());
        assert!(snapshot.cpu.is_none());

        let updates = snapshot.into_updates();
        let endpoints: Vec<Endpoint> = updates.iter().map(Update::endpoint).collect();
        assert_eq!(endpoints, vec![Endpoint::Traces, Endpoint::Health, Endpoint::Uptime]);
        assert!(matches!(&updates[0], Update::Traces(t) if t.len() == 1));
    }

    #[test]
    fn test_empty_object_is_empty_snapshot() {
        let snapshot: DashboardSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.into_updates().is_empty());
    }
}
