// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # actuator-dash
//!
//! A terminal dashboard for Spring-style actuator endpoints.
//!
//! The dashboard polls four endpoints (HTTP traces, health, CPU count and
//! process uptime), groups traces by status code, formats the free disk
//! space, and keeps a live uptime clock ticking between fetches.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (apply)  │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource | ChannelSource     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Navigation, selection, search and export
//! - **[`source`]**: The [`DataSource`] trait, the actuator HTTP client and
//!   the three sources built on it
//! - **[`data`]**: Trace buckets, health and metric records, the byte
//!   formatter and the uptime ticker, gathered in [`DashboardData`]
//! - **[`ui`]**: Rendering with ratatui
//! - **[`config`]** and **[`logging`]**: Settings and log output for the binary
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a local service
//! actuator-dash --url http://localhost:8080/actuator
//!
//! # View a captured snapshot
//! actuator-dash --file snapshot.json
//!
//! # Fetch once and write a JSON summary
//! actuator-dash --url http://localhost:8080/actuator --export state.json
//! ```
//!
//! ### As a library with the HTTP source
//!
//! ```
//! use actuator_dash::{ActuatorClient, App, HttpSource, Theme};
//!
//! let client = ActuatorClient::builder()
//!     .base_url("http://localhost:8080/actuator")
//!     .build()
//!     .unwrap();
//! let app = App::new(Box::new(HttpSource::new(client)), Theme::dark());
//! ```
//!
//! ### Classifying traces directly
//!
//! ```
//! use actuator_dash::data::{classify, StatusClass, Trace};
//!
//! let buckets = classify(Vec::<Trace>::new());
//! assert!(buckets.bucket(StatusClass::Ok).is_empty());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use crate::config::DashboardConfig;
pub use data::{
    format_bytes, format_uptime, BucketSet, DashboardData, HealthStatus, StatusClass,
    SystemCpu, SystemHealth, Trace, Uptime,
};
pub use source::{
    ActuatorClient, ChannelSource, DashboardSnapshot, DataSource, Endpoint, FetchError,
    FileSource, HttpSource, Update,
};
pub use ui::Theme;
