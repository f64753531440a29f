//! The page the watcher looks at: where the order list lives and how it
//! reports changes.

pub mod document;
pub mod dom;

pub use document::{Document, DocumentContainer, DocumentLocator};
pub use dom::{ClassMarker, Element};

use tokio::sync::mpsc;

/// One delivery of "something under the container changed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationBatch {
    pub seq: u64,
}

/// A live order list.
pub trait Container: Send {
    /// Rows currently rendered, or `None` once the container has left the page.
    fn row_count(&self) -> Option<usize>;

    /// Starts a mutation subscription covering attributes, children and the
    /// whole subtree. The stream ends when the container is removed or the
    /// page goes away.
    fn observe(&self) -> mpsc::UnboundedReceiver<MutationBatch>;
}

/// Finds the order list. Returning `None` means "not rendered yet".
pub trait ContainerLocator: Send {
    type Container: Container;

    fn locate(&mut self) -> Option<Self::Container>;
}
