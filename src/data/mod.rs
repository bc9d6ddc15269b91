//! Data models and processing for actuator responses.
//!
//! This module turns raw endpoint responses into the state the dashboard
//! renders.
//!
//! ## Submodules
//!
//! - [`trace`]: HTTP trace records and bucketing by status code
//! - [`metrics`]: Health and metric records ([`SystemHealth`], [`SystemCpu`])
//! - [`bytes`]: Human-readable byte sizes for the disk-space field
//! - [`uptime`]: The live uptime counter and its `HHh MMm SSs` format
//! - [`dashboard`]: [`DashboardData`], the state fed by fetch results
//!
//! ## Data Flow
//!
//! ```text
//! Update (one per endpoint response)
//!        │
//!        ▼
//! DashboardData::apply()
//!        │
//!        ├──▶ Traces  ──▶ BucketSet::classify()
//!        ├──▶ Health  ──▶ SystemHealth::format_disk_space()
//!        ├──▶ Cpu     ──▶ stored as received
//!        └──▶ Uptime  ──▶ Uptime::restart() (one-second ticker)
//! ```

pub mod bytes;
pub mod dashboard;
pub mod metrics;
pub mod trace;
pub mod uptime;

pub use bytes::{format_bytes, ByteFormatError};
pub use dashboard::DashboardData;
pub use metrics::{
    Components, DiskDetails, DiskFree, DiskSpace, HealthStatus, Measurement, Metric, SystemCpu,
    SystemHealth,
};
pub use trace::{
    classify, BucketSet, HttpTraceResponse, StatusClass, Trace, TraceRequest, TraceResponse,
};
pub use uptime::{format_uptime, TickerHandle, Uptime};
