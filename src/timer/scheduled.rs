//! A single-slot scheduled task: at most one payload waits for its deadline.
//!
//! Nothing here spawns or sleeps. The owner asks for [`ScheduledTask::deadline`],
//! waits for it however it likes (the watcher loop uses [`sleep_until_deadline`]),
//! then calls [`ScheduledTask::fire_if_due`] with the current instant. Tests drive
//! the same calls with hand-built instants or tokio's paused clock.

use std::future;

use tokio::time::{self, Instant};

#[derive(Debug)]
pub struct ScheduledTask<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for ScheduledTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ScheduledTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` for `at`, replacing whatever was pending.
    /// Returns the superseded payload, if any.
    pub fn schedule(&mut self, at: Instant, payload: T) -> Option<T> {
        self.pending.replace((at, payload)).map(|(_, old)| old)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, payload)| payload)
    }

    /// Takes the payload if its deadline is at or before `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((at, _)) if at <= now => self.cancel(),
            _ => None,
        }
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Sleeps until `deadline`, or forever when there is none.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => future::pending::<()>().await,
    }
}
