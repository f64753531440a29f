pub mod notifier;
pub mod sinks;

pub use notifier::Notifier;
pub use sinks::{ChannelSink, LogSink, StdoutSink};

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tracking::OrderEvent;

/// One outbound notification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub event: OrderEvent,
    pub label: &'static str,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(event: OrderEvent, raised_at: DateTime<Utc>) -> Self {
        Self {
            event,
            label: event.label(),
            raised_at,
        }
    }
}

/// Somewhere alerts go. Delivery is fire-and-forget: an `Err` is logged by the
/// caller and the alert is dropped.
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &'static str;

    fn dispatch(&self, alert: &Alert) -> Result<()>;
}

pub type SharedSink = Arc<dyn AlertSink>;
