//! Process uptime counter.
//!
//! The server reports its uptime once per fetch; between fetches the
//! dashboard keeps the clock moving with a one-second ticker task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// Interval between counter increments.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Format seconds as `HHh MMm SSs`, e.g. `3725` -> `"01h 02m 05s"`.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}h {:02}m {:02}s", hours, minutes, secs)
}

/// Convert a server-reported uptime (float seconds) into a ticker seed.
///
/// Fractions are floored. Negative and non-finite values clamp to zero.
pub fn seed_from_seconds(raw: f64) -> u64 {
    if raw.is_finite() && raw > 0.0 {
        raw.floor() as u64
    } else {
        0
    }
}

/// Handle to a running ticker task.
///
/// Dropping the handle stops the task, as does calling [`TickerHandle::stop`].
#[derive(Debug)]
pub struct TickerHandle {
    counter: Arc<AtomicU64>,
    stop_tx: watch::Sender<bool>,
}

impl TickerHandle {
    /// Current counter value.
    pub fn seconds(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Cancel future increments. Safe to call more than once.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Seed a counter and spawn a task that increments it once per [`TICK_PERIOD`].
///
/// The first increment happens one period after start. Must be called from
/// within a tokio runtime.
pub fn start(initial_seconds: u64) -> TickerHandle {
    let counter = Arc::new(AtomicU64::new(initial_seconds));
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let task_counter = counter.clone();

    tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

        loop {
            tokio::select! {
                biased;
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = timer.tick() => {
                    task_counter.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        debug!("uptime ticker stopped");
    });

    TickerHandle { counter, stop_tx }
}

/// Owner of the single active ticker for a session.
///
/// Restarting always stops the previous ticker first, so a refresh never
/// leaves two tasks incrementing the same clock.
#[derive(Debug, Default)]
pub struct Uptime {
    ticker: Option<TickerHandle>,
    /// Last value seen when no ticker is running.
    frozen: u64,
}

impl Uptime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop any running ticker and start a new one from `seed`.
    pub fn restart(&mut self, seed: u64) {
        self.stop();
        self.ticker = Some(start(seed));
        debug!(seed, "uptime ticker started");
    }

    /// Stop the running ticker, keeping its last value.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
            self.frozen = ticker.seconds();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn seconds(&self) -> u64 {
        self.ticker.as_ref().map_or(self.frozen, TickerHandle::seconds)
    }

    pub fn formatted(&self) -> String {
        format_uptime(self.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "00h 00m 00s");
        assert_eq!(format_uptime(59), "00h 00m 59s");
        assert_eq!(format_uptime(3725), "01h 02m 05s");
        assert_eq!(format_uptime(86_399), "23h 59m 59s");
        assert_eq!(format_uptime(360_000), "100h 00m 00s");
    }

    #[test]
    fn test_seed_from_seconds() {
        assert_eq!(seed_from_seconds(3725.9), 3725);
        assert_eq!(seed_from_seconds(0.0), 0);
        assert_eq!(seed_from_seconds(-12.0), 0);
        assert_eq!(seed_from_seconds(f64::NAN), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_increments_once_per_second() {
        let handle = start(100);
        assert_eq!(handle.seconds(), 100);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(handle.seconds(), 103);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_freezes_counter() {
        let handle = start(0);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());

        let value = handle.seconds();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.seconds(), value);
        assert_eq!(value, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_does_not_double_increment() {
        let mut uptime = Uptime::new();
        uptime.restart(10);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // A refresh reseeds without stopping explicitly first.
        uptime.restart(50);
        uptime.restart(50);
        tokio::time::sleep(Duration::from_millis(4200)).await;

        assert_eq!(uptime.seconds(), 54);
    }

    #[tokio::test(start_paused = true)]
    async fn test_uptime_stop_keeps_last_value() {
        let mut uptime = Uptime::new();
        assert!(!uptime.is_running());
        assert_eq!(uptime.formatted(), "00h 00m 00s");

        uptime.restart(3600);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        uptime.stop();
        assert!(!uptime.is_running());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(uptime.seconds(), 3601);
        assert_eq!(uptime.formatted(), "01h 00m 01s");
    }
}
