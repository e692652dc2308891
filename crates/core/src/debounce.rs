//! Trailing-edge debounce driven by a host clock.
//!
//! The debouncer owns no timer. The host passes the current time into
//! [`Debouncer::call`] and [`Debouncer::poll`], which keeps it deterministic
//! under test and lets teardown cancel a pending call by simply dropping it.

use std::time::Duration;

use tracing::trace;

/// Collapses bursts of calls into one call carrying the last arguments.
///
/// Each `call` replaces any pending call and pushes the deadline to
/// `now + delay`. `poll` hands the arguments back once, after the deadline.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    delay: Duration,
    pending: Option<(Duration, A)>,
}

impl<A> Debouncer<A> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period required before a call fires.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `args`, cancelling whatever was pending.
    pub fn call(&mut self, now: Duration, args: A) {
        let deadline = now + self.delay;
        if self.pending.is_some() {
            trace!(?deadline, "debounce rescheduled");
        } else {
            trace!(?deadline, "debounce scheduled");
        }
        self.pending = Some((deadline, args));
    }

    /// Returns the pending arguments if their deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<A> {
        match self.pending.take() {
            Some((deadline, args)) if now >= deadline => Some(args),
            still_waiting => {
                self.pending = still_waiting;
                None
            }
        }
    }

    /// Polls and runs `f` with the arguments when due. Returns whether `f` ran.
    pub fn fire<F: FnOnce(A)>(&mut self, now: Duration, f: F) -> bool {
        match self.poll(now) {
            Some(args) => {
                f(args);
                true
            }
            None => false,
        }
    }

    /// Drops the pending call, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            trace!("debounce cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending call becomes due.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(d, _)| *d)
    }
}
