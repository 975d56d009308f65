//! Auto-refresh timer
//!
//! Explicit periodic-task abstraction behind the dashboard's auto-refresh:
//! a spawned task that sends a tick message over the TUI channel at a fixed
//! interval. `stop` and `reschedule` abort only the pending delay — an HTTP
//! request already in flight is never cancelled, the next tick simply finds
//! the refresh guard still set and is skipped by the receiver.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct RefreshTimer<M> {
    tx: mpsc::Sender<M>,
    tick: M,
    handle: Option<JoinHandle<()>>,
}

impl<M: Clone + Send + 'static> RefreshTimer<M> {
    /// Create a stopped timer that will send `tick` on each interval
    pub fn new(tx: mpsc::Sender<M>, tick: M) -> Self {
        Self {
            tx,
            tick,
            handle: None,
        }
    }

    /// Arm the timer, replacing any pending schedule
    pub fn start(&mut self, interval: Duration) {
        self.stop();
        debug!(?interval, "starting auto-refresh timer");

        let tx = self.tx.clone();
        let tick = self.tick.clone();
        self.handle = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if tx.send(tick.clone()).await.is_err() {
                    // Receiver gone, the TUI is shutting down
                    break;
                }
            }
        }));
    }

    /// Cancel the pending tick; a no-op when already stopped
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("stopping auto-refresh timer");
            handle.abort();
        }
    }

    /// Restart with a new interval, but only if the timer is armed
    pub fn reschedule(&mut self, interval: Duration) {
        if self.is_running() {
            self.start(interval);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<M> Drop for RefreshTimer<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Tick;

    #[tokio::test]
    async fn test_timer_ticks_repeatedly() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = RefreshTimer::new(tx, Tick);
        timer.start(Duration::from_millis(10));

        for _ in 0..3 {
            let tick = timeout(Duration::from_secs(1), rx.recv()).await;
            assert_eq!(tick.expect("timer stalled"), Some(Tick));
        }
    }

    #[tokio::test]
    async fn test_stop_cancels_pending_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = RefreshTimer::new(tx, Tick);
        timer.start(Duration::from_millis(20));
        timer.stop();
        assert!(!timer.is_running());

        // Drains nothing: the pending delay was aborted before firing
        let result = timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(result.is_err(), "tick fired after stop");
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = RefreshTimer::new(tx, Tick);
        timer.start(Duration::from_millis(10));
        timer.stop();
        timer.start(Duration::from_millis(10));

        let tick = timeout(Duration::from_secs(1), rx.recv()).await;
        assert_eq!(tick.expect("timer stalled"), Some(Tick));
    }

    #[tokio::test]
    async fn test_reschedule_is_noop_when_stopped() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer: RefreshTimer<Tick> = RefreshTimer::new(tx, Tick);
        timer.reschedule(Duration::from_millis(10));
        assert!(!timer.is_running());

        let result = timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(result.is_err());
    }
}
