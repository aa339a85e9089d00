//! Periodic tick delivery for a running timer.
//!
//! Ticks carry no data: the engine always re-reads the clock, so a skipped
//! or coalesced tick only delays the display, never the timer itself.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Background interval task feeding a one-slot channel.
///
/// Dropping the driver aborts the task. Must be armed inside a tokio runtime.
pub struct TickDriver {
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<()>,
}

impl TickDriver {
    pub fn arm(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match tx.try_send(()) {
                    // A full slot means the consumer has a tick pending already.
                    Ok(()) | Err(TrySendError::Full(())) => {}
                    Err(TrySendError::Closed(())) => break,
                }
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "tick driver armed");
        Self { handle, rx }
    }

    /// Wait for the next tick. `false` once the task has stopped.
    pub async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Arms a [`TickDriver`] while the timer runs and tears it down otherwise.
pub struct Ticker {
    period: Duration,
    driver: Option<TickDriver>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            driver: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.driver.is_some()
    }

    /// Align the driver with the timer's running flag.
    pub fn sync(&mut self, running: bool) {
        match (running, self.driver.is_some()) {
            (true, false) => self.driver = Some(TickDriver::arm(self.period)),
            (false, true) => self.disarm(),
            _ => {}
        }
    }

    pub fn disarm(&mut self) {
        if self.driver.take().is_some() {
            tracing::debug!("tick driver disarmed");
        }
    }

    /// Resolves on the next tick; never resolves while disarmed, which makes
    /// it safe to use as a `tokio::select!` branch.
    pub async fn tick(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            if driver.tick().await {
                return;
            }
            self.driver = None;
        }
        std::future::pending::<()>().await
    }
}
