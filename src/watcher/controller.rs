use std::ops::ControlFlow;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::state::OrderTracker;
use crate::alert::SharedSink;
use crate::page::{Container, ContainerLocator, MutationBatch};
use crate::settings::WatchSettings;
use crate::timer::sleep_until_deadline;
use crate::tracking::{InteractionFilter, InteractionTarget};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Why a watcher stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    Cancelled,
    /// The interaction stream closed before the order list was found.
    InputClosed,
    /// The order list left the page (or the page closed) and re-attaching is off.
    ContainerRemoved,
}

/// Finds the order list, then turns its mutations into alerts.
///
/// All state lives here and is only touched from the task running
/// [`OrderWatcher::run`], so none of it needs a lock.
pub struct OrderWatcher<L: ContainerLocator> {
    id: Uuid,
    locator: L,
    settings: WatchSettings,
    tracker: OrderTracker,
}

impl<L: ContainerLocator> OrderWatcher<L> {
    pub fn new(
        locator: L,
        settings: WatchSettings,
        filter: Box<dyn InteractionFilter>,
        sinks: Vec<SharedSink>,
    ) -> Self {
        let tracker = OrderTracker::new(&settings, filter, sinks);
        Self {
            id: Uuid::new_v4(),
            locator,
            settings,
            tracker,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn run(
        mut self,
        mut interactions: mpsc::UnboundedReceiver<InteractionTarget>,
        cancel: CancellationToken,
    ) -> WatchExit {
        loop {
            let container = match self.search(&mut interactions, &cancel).await {
                ControlFlow::Continue(container) => container,
                ControlFlow::Break(exit) => return exit,
            };

            if let ControlFlow::Break(exit) =
                self.watch(container, &mut interactions, &cancel).await
            {
                return exit;
            }

            self.tracker.reset_rows();
        }
    }

    async fn search(
        &mut self,
        interactions: &mut mpsc::UnboundedReceiver<InteractionTarget>,
        cancel: &CancellationToken,
    ) -> ControlFlow<WatchExit, L::Container> {
        let period = self.settings.search_interval();
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let deadline = self.tracker.next_deadline();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return ControlFlow::Break(WatchExit::Cancelled),
                _ = sleep_until_deadline(deadline) => {
                    self.tracker.fire_due(Instant::now());
                }
                _ = ticker.tick() => {
                    if let Some(container) = self.locator.locate() {
                        return ControlFlow::Continue(container);
                    }
                    log_debug!("[{}] order list not on the page yet, retrying in {:?}", self.id, period);
                }
                received = interactions.recv() => {
                    // Clicks only count once the list is being watched.
                    if received.is_none() {
                        self.drain(cancel).await;
                        return ControlFlow::Break(WatchExit::InputClosed);
                    }
                }
            }
        }
    }

    /// Returns `Continue` when the watcher should search again.
    async fn watch(
        &mut self,
        container: L::Container,
        interactions: &mut mpsc::UnboundedReceiver<InteractionTarget>,
        cancel: &CancellationToken,
    ) -> ControlFlow<WatchExit> {
        let mut mutations = container.observe();
        log_info!(
            "[{}] order list found ({} rows), watching for changes",
            self.id,
            container.row_count().unwrap_or(0)
        );

        let mut interactions_open = true;
        loop {
            let deadline = self.tracker.next_deadline();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return ControlFlow::Break(WatchExit::Cancelled),
                _ = sleep_until_deadline(deadline) => {
                    if let Some(event) = self.tracker.fire_due(Instant::now()) {
                        log_debug!("[{}] alert sent: {}", self.id, event);
                    }
                }
                received = interactions.recv(), if interactions_open => match received {
                    Some(target) => self.on_interaction(&target),
                    None => interactions_open = false,
                },
                batch = mutations.recv() => match batch {
                    Some(batch) => self.on_mutation(&container, batch),
                    None => break,
                },
            }
        }

        self.drain(cancel).await;
        if cancel.is_cancelled() {
            return ControlFlow::Break(WatchExit::Cancelled);
        }

        if self.settings.reattach_on_removal {
            log_warn!("[{}] order list left the page, searching again", self.id);
            return ControlFlow::Continue(());
        }

        log_warn!("[{}] order list left the page, no longer watching", self.id);
        ControlFlow::Break(WatchExit::ContainerRemoved)
    }

    /// Lets a pending alert go out on schedule before the watcher stops.
    async fn drain(&mut self, cancel: &CancellationToken) {
        while let Some(deadline) = self.tracker.alert_deadline() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = time::sleep_until(deadline) => {
                    self.tracker.fire_due(Instant::now());
                }
            }
        }
    }

    fn on_interaction(&mut self, target: &InteractionTarget) {
        if self.tracker.on_interaction(target, Instant::now()) {
            log_debug!("[{}] actionable click on <{}>", self.id, target.tag);
        }
    }

    fn on_mutation(&mut self, container: &L::Container, batch: MutationBatch) {
        let Some(rows) = container.row_count() else {
            log_debug!("[{}] mutation #{} after the list left the page", self.id, batch.seq);
            return;
        };

        let cycle = self.tracker.on_rows(rows, Instant::now());
        if cycle.delta != 0 {
            log_debug!(
                "[{}] rows {} ({:+}), user intent {}, event {:?}",
                self.id,
                cycle.rows,
                cycle.delta,
                cycle.user_intent,
                cycle.event
            );
        }
    }
}

/// Owns a running watcher task: its cancel token and the sending half of
/// its interaction stream.
pub struct WatcherController {
    handle: Option<JoinHandle<WatchExit>>,
    cancel_token: Option<CancellationToken>,
    interactions: Option<mpsc::UnboundedSender<InteractionTarget>>,
}

impl Default for WatcherController {
    fn default() -> Self {
        Self::new()
    }
}

impl WatcherController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            interactions: None,
        }
    }

    pub fn start<L>(&mut self, watcher: OrderWatcher<L>) -> Result<()>
    where
        L: ContainerLocator + 'static,
        L::Container: 'static,
    {
        if self.handle.is_some() {
            bail!("watcher already running");
        }

        let cancel_token = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        log_info!("Starting order watcher {}", watcher.id());
        let handle = tokio::spawn(watcher.run(rx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.interactions = Some(tx);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Feeds one click into the watcher. Dropped silently when not running.
    pub fn interact(&self, target: InteractionTarget) {
        if let Some(tx) = &self.interactions {
            let _ = tx.send(target);
        }
    }

    /// Closes the interaction stream; the watcher keeps reacting to mutations.
    pub fn close_input(&mut self) {
        self.interactions = None;
    }

    /// Closes input and waits for the watcher to finish on its own.
    pub async fn wait(&mut self) -> Result<Option<WatchExit>> {
        self.interactions = None;
        self.cancel_token = None;
        match self.handle.take() {
            Some(handle) => handle
                .await
                .context("watcher task failed to join")
                .map(Some),
            None => Ok(None),
        }
    }

    pub async fn stop(&mut self) -> Result<Option<WatchExit>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.wait().await
    }
}
