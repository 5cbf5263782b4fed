//! Cancellable one-shot timer

use std::time::Duration;

use tokio::task::JoinHandle;

/// Holds at most one pending timer
///
/// Scheduling aborts whatever was pending. Every schedule gets a new
/// sequence number, and only the latest one is accepted by `settle`, which
/// also rejects a firing that was already queued when it got replaced.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    seq: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            seq: 0,
        }
    }

    /// Replace any pending timer with one that calls `fire(seq)` after the delay
    pub fn schedule<F>(&mut self, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.seq += 1;

        let seq = self.seq;
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(seq);
        }));

        seq
    }

    /// Drop the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a firing if it belongs to the latest schedule
    pub fn settle(&mut self, seq: u64) -> bool {
        if seq != self.seq || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
