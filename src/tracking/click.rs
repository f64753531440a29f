use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::timer::DebouncedFlag;

/// The element an interaction originated on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionTarget {
    pub tag: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl InteractionTarget {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Decides whether an interaction could have changed the order list.
pub trait InteractionFilter: Send {
    fn is_actionable(&self, target: &InteractionTarget) -> bool;
}

impl<F> InteractionFilter for F
where
    F: Fn(&InteractionTarget) -> bool + Send,
{
    fn is_actionable(&self, target: &InteractionTarget) -> bool {
        self(target)
    }
}

/// Accepts targets whose tag or ARIA role is in a fixed list (case-insensitive).
#[derive(Debug, Clone)]
pub struct TagFilter {
    tags: Vec<String>,
    roles: Vec<String>,
}

impl TagFilter {
    pub fn new<T, R>(tags: T, roles: R) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::new(["BUTTON"], ["button"])
    }
}

impl InteractionFilter for TagFilter {
    fn is_actionable(&self, target: &InteractionTarget) -> bool {
        if self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(&target.tag)) {
            return true;
        }
        target.role.as_deref().is_some_and(|role| {
            self.roles
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(role))
        })
    }
}

/// Holds the "user just clicked something" flag.
pub struct ClickTracker {
    flag: DebouncedFlag,
    filter: Box<dyn InteractionFilter>,
}

impl ClickTracker {
    pub fn new(window: Duration, filter: Box<dyn InteractionFilter>) -> Self {
        Self {
            flag: DebouncedFlag::new(window),
            filter,
        }
    }

    /// Arms the intent flag when `target` is actionable. Returns whether it was.
    pub fn on_interaction(&mut self, target: &InteractionTarget, now: Instant) -> bool {
        if !self.filter.is_actionable(target) {
            return false;
        }
        self.flag.arm(now);
        true
    }

    pub fn flag(&self) -> &DebouncedFlag {
        &self.flag
    }

    pub fn flag_mut(&mut self) -> &mut DebouncedFlag {
        &mut self.flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[test]
    fn default_filter_accepts_buttons_only() {
        let filter = TagFilter::default();

        assert!(filter.is_actionable(&InteractionTarget::new("BUTTON")));
        assert!(filter.is_actionable(&InteractionTarget::new("button")));
        assert!(filter.is_actionable(&InteractionTarget::new("DIV").with_role("Button")));
        assert!(!filter.is_actionable(&InteractionTarget::new("SPAN")));
        assert!(!filter.is_actionable(&InteractionTarget::new("A").with_role("link")));
    }

    #[test]
    fn non_actionable_clicks_leave_flag_alone() {
        let mut tracker = ClickTracker::new(WINDOW, Box::new(TagFilter::default()));

        assert!(!tracker.on_interaction(&InteractionTarget::new("INPUT"), Instant::now()));
        assert!(!tracker.flag().is_set());
        assert_eq!(tracker.flag().deadline(), None);
    }

    #[test]
    fn actionable_click_arms_for_window() {
        let t0 = Instant::now();
        let mut tracker = ClickTracker::new(WINDOW, Box::new(TagFilter::default()));

        assert!(tracker.on_interaction(&InteractionTarget::new("BUTTON"), t0));
        assert!(tracker.flag().is_set());
        assert_eq!(tracker.flag().deadline(), Some(t0 + WINDOW));
    }

    #[test]
    fn closures_work_as_filters() {
        let only_submit = |target: &InteractionTarget| target.role.as_deref() == Some("submit");
        let mut tracker = ClickTracker::new(WINDOW, Box::new(only_submit));

        assert!(!tracker.on_interaction(&InteractionTarget::new("BUTTON"), Instant::now()));
        assert!(tracker.on_interaction(
            &InteractionTarget::new("BUTTON").with_role("submit"),
            Instant::now()
        ));
    }
}
