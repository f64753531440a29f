use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use super::{Alert, SharedSink};
use crate::timer::ScheduledTask;
use crate::tracking::OrderEvent;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Collapses bursts of classifications into one alert per quiet window.
///
/// Only the latest event survives: a new one replaces the pending one and
/// restarts the window.
pub struct Notifier {
    debounce: Duration,
    pending: ScheduledTask<OrderEvent>,
    sinks: Vec<SharedSink>,
    dispatched: u64,
}

impl Notifier {
    pub fn new(debounce: Duration, sinks: Vec<SharedSink>) -> Self {
        Self {
            debounce,
            pending: ScheduledTask::new(),
            sinks,
            dispatched: 0,
        }
    }

    pub fn notify(&mut self, event: Option<OrderEvent>, now: Instant) {
        let Some(event) = event else {
            return;
        };

        if let Some(superseded) = self.pending.schedule(now + self.debounce, event) {
            log_debug!("alert '{}' superseded by '{}'", superseded, event);
        }
    }

    /// Delivers the pending alert if its window has elapsed.
    pub fn fire_due(&mut self, now: Instant) -> Option<OrderEvent> {
        let event = self.pending.fire_if_due(now)?;
        self.deliver(event);
        Some(event)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    pub fn pending(&self) -> Option<OrderEvent> {
        self.pending.peek().copied()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    fn deliver(&mut self, event: OrderEvent) {
        let alert = Alert::new(event, Utc::now());
        for sink in &self.sinks {
            if let Err(err) = sink.dispatch(&alert) {
                log_warn!("{} sink dropped '{}': {err:#}", sink.name(), alert.label);
            }
        }
        self.dispatched += 1;
    }
}
