//! Batches listener notifications.
//!
//! Every new match would otherwise rebuild the consumer's view. Updates are
//! instead held on a short retriggerable delay; a bounded count of
//! consecutive delays forces a synchronous flush so a dense stream of
//! individually-arriving rows cannot starve the consumer indefinitely.

use std::time::{Duration, Instant};

/// Time source, injectable so batching can be tested deterministically.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
pub struct ResultNotifier {
    delay: Duration,
    max_delays: u32,
    delays_used: u32,
    deadline: Option<Instant>,
}

impl ResultNotifier {
    #[must_use]
    pub fn new(delay: Duration, max_delays: u32) -> Self {
        Self {
            delay,
            max_delays,
            delays_used: 0,
            deadline: None,
        }
    }

    /// Registers a pending update. Returns true when the caller must flush
    /// synchronously because the delay budget is exhausted; otherwise the
    /// flush deadline is (re)armed.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.delays_used >= self.max_delays {
            self.flushed();
            return true;
        }
        self.delays_used += 1;
        self.deadline = Some(now + self.delay);
        false
    }

    /// True when an armed deadline has passed; the caller should flush.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.flushed();
            return true;
        }
        false
    }

    /// Resets delay accounting after a delivery.
    pub fn flushed(&mut self) {
        self.delays_used = 0;
        self.deadline = None;
    }

    /// Cancels any pending deadline without delivering.
    pub fn cancel(&mut self) {
        self.delays_used = 0;
        self.deadline = None;
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
