//! Channel-based data source.
//!
//! Receives endpoint updates pushed through a tokio mpsc channel. Useful
//! for embedding the dashboard where another task already does the
//! fetching, and for driving the app in tests.

use tokio::sync::mpsc;

use super::{DataSource, Update};

const CHANNEL_CAPACITY: usize = 16;

/// A data source that receives updates via a channel.
///
/// # Example
///
/// ```
/// use actuator_dash::{ChannelSource, DataSource};
/// use actuator_dash::source::Update;
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("test harness");
///
/// // Another task fetches and forwards the results
/// tx.send(Update::Traces(vec![])).await.unwrap();
/// assert!(matches!(source.poll(), Some(Update::Traces(_))));
/// assert!(source.poll().is_none());
/// # });
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Update>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an mpsc channel
    /// * `source_description` - Where the updates come from
    pub fn new(receiver: mpsc::Receiver<Update>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            closed: false,
        }
    }

    /// Create a channel pair for sending updates to a ChannelSource.
    pub fn create(source_description: &str) -> (mpsc::Sender<Update>, Self) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Update> {
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.closed.then_some("Channel closed")
    }
}
