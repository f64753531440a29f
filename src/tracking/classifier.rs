use std::fmt;

use serde::{Deserialize, Serialize};

/// What a row-count change is taken to mean.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OrderEvent {
    Placed,
    Cancelled,
    Filled,
}

impl OrderEvent {
    /// Text handed to the alert surface.
    pub fn label(self) -> &'static str {
        match self {
            OrderEvent::Placed => "Order placed",
            OrderEvent::Cancelled => "Order cancelled",
            OrderEvent::Filled => "Order filled",
        }
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a row delta and the user-intent flag to an event.
///
/// Growth is only attributed to the user; growth without a recent click is
/// ignored. Shrinking is a cancel when the user just clicked, a fill otherwise.
/// The size of the delta never matters, only its sign.
pub fn classify(delta: i64, user_intent: bool) -> Option<OrderEvent> {
    match (delta.signum(), user_intent) {
        (0, _) => None,
        (1, true) => Some(OrderEvent::Placed),
        (1, false) => None,
        (_, true) => Some(OrderEvent::Cancelled),
        (_, false) => Some(OrderEvent::Filled),
    }
}
