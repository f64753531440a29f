use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, PoisonError, RwLock,
};

use tokio::sync::mpsc;

use super::{ClassMarker, Container, ContainerLocator, Element, MutationBatch};

struct Observer {
    marker: ClassMarker,
    tx: mpsc::UnboundedSender<MutationBatch>,
}

struct DocumentInner {
    body: RwLock<Element>,
    observers: Mutex<Vec<Observer>>,
    seq: AtomicU64,
    closed: AtomicBool,
}

/// A shared page that the host re-renders and the watcher observes.
///
/// Observers are tied to the container they were opened on. When a render no
/// longer contains that container the observer is dropped and its stream ends.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Element::new("BODY"))
    }
}

impl Document {
    pub fn new(body: Element) -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                body: RwLock::new(body),
                observers: Mutex::new(Vec::new()),
                seq: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Replaces the page content and notifies observers whose container changed.
    pub fn render(&self, body: Element) {
        let mut current = self
            .inner
            .body
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, body);

        let mut observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        observers.retain(|observer| {
            let Some(after) = current.find_first(&observer.marker) else {
                return false;
            };
            if previous.find_first(&observer.marker) == Some(after) {
                return !observer.tx.is_closed();
            }
            let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed);
            observer.tx.send(MutationBatch { seq }).is_ok()
        });
    }

    /// Ends every observation stream. Later subscriptions end immediately.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn query_count(&self, container: &ClassMarker, rows: &ClassMarker) -> Option<usize> {
        let body = self
            .inner
            .body
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        body.find_first(container)
            .map(|element| element.count_matching(rows))
    }

    pub fn contains(&self, marker: &ClassMarker) -> bool {
        self.inner
            .body
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_first(marker)
            .is_some()
    }

    pub fn locator(&self, container_marker: &str, row_marker: &str) -> DocumentLocator {
        DocumentLocator {
            document: self.clone(),
            container: ClassMarker::parse(container_marker),
            rows: ClassMarker::parse(row_marker),
        }
    }

    fn subscribe(&self, marker: ClassMarker) -> mpsc::UnboundedReceiver<MutationBatch> {
        let (tx, rx) = mpsc::unbounded_channel();
        if !self.is_closed() && self.contains(&marker) {
            self.inner
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Observer { marker, tx });
        }
        rx
    }
}

#[derive(Clone)]
pub struct DocumentLocator {
    document: Document,
    container: ClassMarker,
    rows: ClassMarker,
}

impl ContainerLocator for DocumentLocator {
    type Container = DocumentContainer;

    fn locate(&mut self) -> Option<DocumentContainer> {
        if self.document.is_closed() || !self.document.contains(&self.container) {
            return None;
        }
        Some(DocumentContainer {
            document: self.document.clone(),
            container: self.container.clone(),
            rows: self.rows.clone(),
        })
    }
}

pub struct DocumentContainer {
    document: Document,
    container: ClassMarker,
    rows: ClassMarker,
}

impl Container for DocumentContainer {
    fn row_count(&self) -> Option<usize> {
        self.document.query_count(&self.container, &self.rows)
    }

    fn observe(&self) -> mpsc::UnboundedReceiver<MutationBatch> {
        self.document.subscribe(self.container.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "ReactVirtualized__Grid ReactVirtualized__Table__Grid";
    const ROW: &str = "ReactVirtualized__Table__row";

    fn page(rows: usize) -> Element {
        Element::new("BODY").with_child(
            Element::new("DIV")
                .with_class(GRID)
                .with_children((0..rows).map(|i| {
                    Element::new("DIV")
                        .with_class(ROW)
                        .with_text(format!("order {i}"))
                })),
        )
    }

    #[test]
    fn locator_waits_for_container() {
        let document = Document::default();
        let mut locator = document.locator(GRID, ROW);
        assert!(locator.locate().is_none());

        document.render(page(2));
        let container = locator.locate().unwrap();
        assert_eq!(container.row_count(), Some(2));
    }

    #[test]
    fn notifies_only_when_container_subtree_changes() {
        let document = Document::new(page(2));
        let container = document.locator(GRID, ROW).locate().unwrap();
        let mut rx = container.observe();

        document.render(page(2));
        assert!(rx.try_recv().is_err());

        document.render(page(3));
        assert_eq!(rx.try_recv().unwrap().seq, 0);

        // A text change inside a row counts as a subtree mutation.
        let mut edited = page(3);
        edited.children[0].children[1].text = Some("order 1 (partial)".into());
        document.render(edited);
        assert_eq!(rx.try_recv().unwrap().seq, 1);
    }

    #[test]
    fn removed_container_ends_stream() {
        let document = Document::new(page(1));
        let container = document.locator(GRID, ROW).locate().unwrap();
        let mut rx = container.observe();

        document.render(Element::new("BODY"));
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
        assert_eq!(container.row_count(), None);
        assert_eq!(document.observer_count(), 0);
    }

    #[test]
    fn close_ends_every_stream() {
        let document = Document::new(page(1));
        let container = document.locator(GRID, ROW).locate().unwrap();
        let mut first = container.observe();

        document.close();
        let mut late = container.observe();

        assert!(matches!(
            first.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
        assert!(matches!(
            late.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
