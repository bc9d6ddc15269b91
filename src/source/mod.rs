//! Data source abstraction for receiving actuator data.
//!
//! This module provides a trait-based abstraction over where endpoint
//! responses come from: live HTTP polling, a snapshot file on disk, or an
//! in-process channel.

mod channel;
mod client;
mod error;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use client::{ActuatorClient, ActuatorClientBuilder, DEFAULT_BASE_URL};
pub use error::FetchError;
pub use file::FileSource;
pub use http::HttpSource;
pub use snapshot::DashboardSnapshot;

use std::fmt::{self, Debug};

use crate::data::{Metric, SystemCpu, SystemHealth, Trace};

/// One of the four actuator endpoints the dashboard polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
    Traces,
    Health,
    Cpu,
    Uptime,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Traces,
        Endpoint::Health,
        Endpoint::Cpu,
        Endpoint::Uptime,
    ];

    /// Path relative to the actuator base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Traces => "/httptrace",
            Endpoint::Health => "/health",
            Endpoint::Cpu => "/metrics/system.cpu.count",
            Endpoint::Uptime => "/metrics/process.uptime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Traces => "traces",
            Endpoint::Health => "health",
            Endpoint::Cpu => "cpu",
            Endpoint::Uptime => "uptime",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The result of fetching one endpoint.
#[derive(Debug, Clone)]
pub enum Update {
    Traces(Vec<Trace>),
    Health(SystemHealth),
    Cpu(SystemCpu),
    Uptime(Metric),
    /// The fetch failed; the previous value for `endpoint` should be kept.
    Failed { endpoint: Endpoint, error: String },
}

impl Update {
    /// The endpoint this update came from.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Update::Traces(_) => Endpoint::Traces,
            Update::Health(_) => Endpoint::Health,
            Update::Cpu(_) => Endpoint::Cpu,
            Update::Uptime(_) => Endpoint::Uptime,
            Update::Failed { endpoint, .. } => *endpoint,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Update::Failed { .. })
    }
}

/// Trait for receiving actuator data from various sources.
///
/// Implementations deliver one [`Update`] per endpoint response. Updates
/// for different endpoints may arrive in any order.
///
/// # Example
///
/// ```
/// use actuator_dash::{ChannelSource, DataSource};
///
/// let (_tx, mut source) = ChannelSource::create("example");
/// while let Some(update) = source.poll() {
///     println!("got {}", update.endpoint());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Ask the source for fresh data.
    ///
    /// Results are delivered later through [`DataSource::poll`]. Sources that
    /// push data on their own can ignore this.
    fn refresh(&mut self) {}

    /// Take the next pending update, if any. Must not block.
    fn poll(&mut self) -> Option<Update>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Source-level error from the last poll (e.g. an unreadable file).
    ///
    /// Per-endpoint fetch failures are reported as [`Update::Failed`] instead.
    fn error(&self) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Traces.path(), "/httptrace");
        assert_eq!(Endpoint::Health.path(), "/health");
        assert_eq!(Endpoint::Cpu.path(), "/metrics/system.cpu.count");
        assert_eq!(Endpoint::Uptime.path(), "/metrics/process.uptime");
    }

    #[test]
    fn test_update_endpoint() {
        assert_eq!(Update::Traces(vec![]).endpoint(), Endpoint::Traces);
        let failed = Update::Failed {
            endpoint: Endpoint::Cpu,
            error: "boom".to_string(),
        };
        assert_eq!(failed.endpoint(), Endpoint::Cpu);
        assert!(failed.is_failure());
        assert_eq!(Endpoint::Uptime.to_string(), "uptime");
    }
}
