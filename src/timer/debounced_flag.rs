use std::time::Duration;

use tokio::time::Instant;

use super::ScheduledTask;

/// A boolean that falls back to `false` once `window` passes without a re-arm.
///
/// At most one expiry is ever pending: `arm` pushes the existing expiry out
/// instead of adding a second one.
#[derive(Debug)]
pub struct DebouncedFlag {
    value: bool,
    window: Duration,
    expiry: ScheduledTask<()>,
}

impl DebouncedFlag {
    pub fn new(window: Duration) -> Self {
        Self {
            value: false,
            window,
            expiry: ScheduledTask::new(),
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.value = true;
        self.expiry.schedule(now + self.window, ());
    }

    /// Returns the value and leaves the flag cleared with no expiry pending.
    pub fn consume_and_reset(&mut self) -> bool {
        let value = self.value;
        self.value = false;
        self.expiry.cancel();
        value
    }

    /// Applies the expiry if it is due. Returns true when this call cleared the flag.
    pub fn expire_due(&mut self, now: Instant) -> bool {
        if self.expiry.fire_if_due(now).is_some() {
            self.value = false;
            return true;
        }
        false
    }

    pub fn is_set(&self) -> bool {
        self.value
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.expiry.deadline()
    }
}
