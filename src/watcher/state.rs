use tokio::time::Instant;

use crate::alert::{Notifier, SharedSink};
use crate::settings::WatchSettings;
use crate::timer::earliest;
use crate::tracking::{
    classify, ClickTracker, InteractionFilter, InteractionTarget, OrderEvent, RowCounter,
};

/// Outcome of one mutation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub rows: usize,
    pub delta: i64,
    pub user_intent: bool,
    pub event: Option<OrderEvent>,
}

/// Everything one watcher remembers between callbacks.
pub struct OrderTracker {
    rows: RowCounter,
    clicks: ClickTracker,
    notifier: Notifier,
    consume_intent_on_unchanged: bool,
}

impl OrderTracker {
    pub fn new(
        settings: &WatchSettings,
        filter: Box<dyn InteractionFilter>,
        sinks: Vec<SharedSink>,
    ) -> Self {
        Self {
            rows: RowCounter::new(),
            clicks: ClickTracker::new(settings.intent_window(), filter),
            notifier: Notifier::new(settings.notify_debounce(), sinks),
            consume_intent_on_unchanged: settings.consume_intent_on_unchanged,
        }
    }

    pub fn on_interaction(&mut self, target: &InteractionTarget, now: Instant) -> bool {
        self.clicks.on_interaction(target, now)
    }

    /// Row counter, classifier and notifier for one mutation batch.
    pub fn on_rows(&mut self, rows: usize, now: Instant) -> Cycle {
        self.clicks.flag_mut().expire_due(now);

        let delta = self.rows.observe(rows);
        let user_intent = if delta == 0 && !self.consume_intent_on_unchanged {
            self.clicks.flag().is_set()
        } else {
            self.clicks.flag_mut().consume_and_reset()
        };

        let event = classify(delta, user_intent);
        self.notifier.notify(event, now);

        Cycle {
            rows,
            delta,
            user_intent,
            event,
        }
    }

    /// Runs whichever timers are due. Returns the alert dispatched, if any.
    pub fn fire_due(&mut self, now: Instant) -> Option<OrderEvent> {
        self.clicks.flag_mut().expire_due(now);
        self.notifier.fire_due(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(self.clicks.flag().deadline(), self.notifier.deadline())
    }

    pub fn alert_deadline(&self) -> Option<Instant> {
        self.notifier.deadline()
    }

    /// Forgets the last row count, as on a fresh attach.
    pub fn reset_rows(&mut self) {
        self.rows = RowCounter::new();
    }

    pub fn user_intent(&self) -> bool {
        self.clicks.flag().is_set()
    }

    pub fn last_rows(&self) -> usize {
        self.rows.last()
    }

    pub fn pending_alert(&self) -> Option<OrderEvent> {
        self.notifier.pending()
    }

    pub fn alerts_dispatched(&self) -> u64 {
        self.notifier.dispatched()
    }
}
