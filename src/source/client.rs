//! HTTP client for the actuator endpoints.
//!
//! ## Example
//!
//! ```rust,no_run
//! use actuator_dash::ActuatorClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ActuatorClient::builder()
//!         .base_url("http://localhost:8080/actuator")
//!         .build()?;
//!
//!     let traces = client.fetch_traces().await?;
//!     println!("{} traces", traces.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Endpoint, FetchError, Update};
use crate::data::{HttpTraceResponse, Metric, SystemCpu, SystemHealth, Trace};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/actuator";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the four actuator endpoints the dashboard reads.
#[derive(Debug, Clone)]
pub struct ActuatorClient {
    client: Client,
    base_url: String,
}

impl ActuatorClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ActuatorClientBuilder {
        ActuatorClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint.
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn fetch_traces(&self) -> Result<Vec<Trace>, FetchError> {
        let body: HttpTraceResponse = self.get_json(Endpoint::Traces).await?;
        Ok(body.traces)
    }

    pub async fn fetch_health(&self) -> Result<SystemHealth, FetchError> {
        self.get_json(Endpoint::Health).await
    }

    pub async fn fetch_cpu(&self) -> Result<SystemCpu, FetchError> {
        self.get_json(Endpoint::Cpu).await
    }

    pub async fn fetch_uptime(&self) -> Result<Metric, FetchError> {
        self.get_json(Endpoint::Uptime).await
    }

    /// Fetch one endpoint and wrap the outcome as an [`Update`].
    ///
    /// Errors never escape: they become [`Update::Failed`].
    pub async fn fetch(&self, endpoint: Endpoint) -> Update {
        let result = match endpoint {
            Endpoint::Traces => self.fetch_traces().await.map(Update::Traces),
            Endpoint::Health => self.fetch_health().await.map(Update::Health),
            Endpoint::Cpu => self.fetch_cpu().await.map(Update::Cpu),
            Endpoint::Uptime => self.fetch_uptime().await.map(Update::Uptime),
        };

        result.unwrap_or_else(|e| Update::Failed {
            endpoint,
            error: e.to_string(),
        })
    }

    /// Fetch all four endpoints concurrently.
    ///
    /// Each endpoint yields its own [`Update`]. A failing endpoint becomes
    /// [`Update::Failed`] and does not affect the others.
    ///
    /// ```no_run
    /// use actuator_dash::{ActuatorClient, DashboardData};
    ///
    /// # tokio_test::block_on(async {
    /// let client = ActuatorClient::builder()
    ///     .base_url("http://localhost:8080/actuator")
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut data = DashboardData::new();
    /// for update in client.fetch_all().await {
    ///     data.apply(update);
    /// }
    /// # });
    /// ```
    pub async fn fetch_all(&self) -> Vec<Update> {
        let (traces, health, cpu, uptime) = tokio::join!(
            self.fetch(Endpoint::Traces),
            self.fetch(Endpoint::Health),
            self.fetch(Endpoint::Cpu),
            self.fetch(Endpoint::Uptime),
        );
        vec![traces, health, cpu, uptime]
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, FetchError> {
        let url = self.url_for(endpoint);
        debug!(%url, "fetching");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Builder for [`ActuatorClient`].
#[derive(Debug, Default)]
pub struct ActuatorClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ActuatorClientBuilder {
    /// Set the actuator base URL (e.g., "http://localhost:8080/actuator").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ActuatorClient, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(ActuatorClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}
