//! HTTP trace records and status-code bucketing.
//!
//! Traces come from the actuator `/httptrace` endpoint. Each fetch replaces
//! the whole [`BucketSet`]; nothing is merged across refreshes.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::HealthStatus;

/// Response body of the `/httptrace` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpTraceResponse {
    #[serde(default)]
    pub traces: Vec<Trace>,
}

/// One recorded HTTP request/response exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub request: TraceRequest,
    #[serde(default)]
    pub response: TraceResponse,
    /// Milliseconds spent handling the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRequest {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceResponse {
    /// HTTP status code. Missing or fractional values become `None`.
    #[serde(default, deserialize_with = "lenient_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default)]
    pub headers: BTreeMap<String, Value>,
}

/// Accept any JSON value for `status`, keeping it only when it is a whole
/// number. `200.0` counts as `200`.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        })
    }))
}

impl Trace {
    /// Bucket this trace belongs to.
    pub fn class(&self) -> StatusClass {
        StatusClass::from_status(self.response.status)
    }

    /// Severity used for colouring, derived from the status range.
    pub fn health(&self) -> HealthStatus {
        match self.response.status {
            Some(s) if (500..600).contains(&s) => HealthStatus::Critical,
            Some(s) if (400..500).contains(&s) => HealthStatus::Warning,
            Some(s) if (100..400).contains(&s) => HealthStatus::Healthy,
            _ => HealthStatus::Warning,
        }
    }
}

/// Status classification of a trace.
///
/// The mapping from status codes is total: anything that is not exactly
/// 200, 400, 404 or 500 lands in [`StatusClass::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusClass {
    Ok,
    BadRequest,
    NotFound,
    ServerError,
    Other,
}

impl StatusClass {
    /// All classes in display order.
    pub const ALL: [StatusClass; 5] = [
        StatusClass::Ok,
        StatusClass::BadRequest,
        StatusClass::NotFound,
        StatusClass::ServerError,
        StatusClass::Other,
    ];

    pub fn from_status(status: Option<i64>) -> Self {
        match status {
            Some(200) => StatusClass::Ok,
            Some(400) => StatusClass::BadRequest,
            Some(404) => StatusClass::NotFound,
            Some(500) => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }

    /// Short label used in tabs, charts and exports.
    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Ok => "200",
            StatusClass::BadRequest => "400",
            StatusClass::NotFound => "404",
            StatusClass::ServerError => "500",
            StatusClass::Other => "Other",
        }
    }

    fn index(self) -> usize {
        match self {
            StatusClass::Ok => 0,
            StatusClass::BadRequest => 1,
            StatusClass::NotFound => 2,
            StatusClass::ServerError => 3,
            StatusClass::Other => 4,
        }
    }
}

/// Traces grouped by [`StatusClass`], each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSet {
    buckets: [Vec<Trace>; 5],
}

impl BucketSet {
    /// Split traces into buckets with a single pass over the input.
    pub fn classify(traces: impl IntoIterator<Item = Trace>) -> Self {
        let mut set = Self::default();
        for trace in traces {
            set.buckets[trace.class().index()].push(trace);
        }
        set
    }

    pub fn bucket(&self, class: StatusClass) -> &[Trace] {
        &self.buckets[class.index()]
    }

    /// Per-class counts in [`StatusClass::ALL`] order.
    pub fn counts(&self) -> [(StatusClass, usize); 5] {
        StatusClass::ALL.map(|class| (class, self.bucket(class).len()))
    }

    /// Total number of traces across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusClass, &[Trace])> + '_ {
        StatusClass::ALL.into_iter().map(move |class| (class, self.bucket(class)))
    }
}

/// Classify traces by response status. See [`BucketSet::classify`].
pub fn classify(traces: impl IntoIterator<Item = Trace>) -> BucketSet {
    BucketSet::classify(traces)
}
