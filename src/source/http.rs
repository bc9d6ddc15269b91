//! Live HTTP data source.
//!
//! Each refresh spawns one task per endpoint. Results come back over a
//! channel and are handed out by `poll()` in completion order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::{ActuatorClient, DataSource, Endpoint, Update};

/// A data source that polls the actuator endpoints over HTTP.
///
/// `refresh()` must be called from within a tokio runtime.
///
/// # Example
///
/// ```
/// use actuator_dash::{ActuatorClient, DataSource, HttpSource};
///
/// let client = ActuatorClient::builder()
///     .base_url("http://localhost:8080/actuator")
///     .build()
///     .unwrap();
/// let source = HttpSource::new(client);
/// assert_eq!(source.description(), "http: http://localhost:8080/actuator");
/// ```
#[derive(Debug)]
pub struct HttpSource {
    client: ActuatorClient,
    sender: mpsc::Sender<Update>,
    receiver: mpsc::Receiver<Update>,
    description: String,
    in_flight: Arc<AtomicUsize>,
}

impl HttpSource {
    pub fn new(client: ActuatorClient) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        let description = format!("http: {}", client.base_url());
        Self {
            client,
            sender,
            receiver,
            description,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of fetches started but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }
}

impl DataSource for HttpSource {
    fn refresh(&mut self) {
        debug!(base_url = self.client.base_url(), "refreshing all endpoints");

        for endpoint in Endpoint::ALL {
            let client = self.client.clone();
            let tx = self.sender.clone();
            let in_flight = self.in_flight.clone();
            in_flight.fetch_add(1, Ordering::Relaxed);

            tokio::spawn(async move {
                let update = client.fetch(endpoint).await;
                in_flight.fetch_sub(1, Ordering::Relaxed);
                // Only fails if the source itself was dropped
                let _ = tx.send(update).await;
            });
        }
    }

    fn poll(&mut self) -> Option<Update> {
        // The source holds a sender, so the channel never disconnects
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}
