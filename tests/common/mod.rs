#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use order_alert_lib::alert::{Alert, ChannelSink, SharedSink};
use order_alert_lib::page::{
    Container, ContainerLocator, Document, DocumentContainer, DocumentLocator, Element,
    MutationBatch,
};
use order_alert_lib::settings::{DEFAULT_CONTAINER_MARKER, DEFAULT_ROW_MARKER};
use order_alert_lib::tracking::InteractionTarget;
use tokio::sync::mpsc;

/// Order table with `rows` rows. `revision` lands in an attribute so two
/// renders with the same row count still differ.
pub fn page(rows: usize, revision: u32) -> Element {
    Element::new("BODY")
        .with_child(Element::new("BUTTON").with_text("Cancel all"))
        .with_child(
            Element::new("DIV")
                .with_class(DEFAULT_CONTAINER_MARKER)
                .with_attribute("data-revision", revision.to_string())
                .with_children((0..rows).map(|i| {
                    Element::new("DIV")
                        .with_class(DEFAULT_ROW_MARKER)
                        .with_text(format!("BTCUSDT limit #{i}"))
                })),
        )
}

pub fn empty_page() -> Element {
    Element::new("BODY").with_child(Element::new("DIV").with_text("Loading..."))
}

pub fn button() -> InteractionTarget {
    InteractionTarget::new("BUTTON")
}

pub fn channel_sink() -> (Vec<SharedSink>, mpsc::UnboundedReceiver<Alert>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sinks: Vec<SharedSink> = vec![Arc::new(ChannelSink::new(tx))];
    (sinks, rx)
}

/// Gives spawned tasks a turn without moving the clock meaningfully.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<Alert>) -> Vec<&'static str> {
    let mut labels = Vec::new();
    while let Ok(alert) = rx.try_recv() {
        labels.push(alert.label);
    }
    labels
}

/// Locator that counts lookups and subscriptions.
pub struct CountingLocator {
    inner: DocumentLocator,
    pub locates: Arc<AtomicUsize>,
    pub observes: Arc<AtomicUsize>,
}

impl CountingLocator {
    pub fn new(document: &Document) -> Self {
        Self {
            inner: document.locator(DEFAULT_CONTAINER_MARKER, DEFAULT_ROW_MARKER),
            locates: Arc::new(AtomicUsize::new(0)),
            observes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub struct CountingContainer {
    inner: DocumentContainer,
    observes: Arc<AtomicUsize>,
}

impl ContainerLocator for CountingLocator {
    type Container = CountingContainer;

    fn locate(&mut self) -> Option<CountingContainer> {
        self.locates.fetch_add(1, Ordering::SeqCst);
        self.inner.locate().map(|inner| CountingContainer {
            inner,
            observes: self.observes.clone(),
        })
    }
}

impl Container for CountingContainer {
    fn row_count(&self) -> Option<usize> {
        self.inner.row_count()
    }

    fn observe(&self) -> mpsc::UnboundedReceiver<MutationBatch> {
        self.observes.fetch_add(1, Ordering::SeqCst);
        self.inner.observe()
    }
}
