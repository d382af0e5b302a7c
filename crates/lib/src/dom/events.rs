//! Events and listeners.

use std::{fmt, sync::Arc};

use indextree::NodeId;

use super::page::Page;

/// A listener invoked when an event reaches the node (or document) it is
/// registered on. Identity is pointer identity of the `Arc`.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Wraps a closure as a [`Listener`].
pub fn listener(f: impl Fn(&Event) + Send + Sync + 'static) -> Listener {
    Arc::new(f)
}

/// Returns true if both listeners are the same registration.
pub fn same_listener(a: &Listener, b: &Listener) -> bool {
    Arc::ptr_eq(a, b)
}

/// An event travelling from its target towards the document.
#[derive(Clone)]
pub struct Event {
    kind: String,
    target: NodeId,
    page: Page,
}

impl Event {
    pub(crate) fn new(kind: &str, target: NodeId, page: Page) -> Self {
        Self {
            kind: kind.to_string(),
            target,
            page,
        }
    }

    /// The event name, e.g. `"click"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The node the event was dispatched at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The page the event was dispatched on. Listeners run without the page
    /// lock held and may lock it to inspect the target.
    pub fn page(&self) -> &Page {
        &self.page
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// One `(event, listener)` pair attached to a node or the document.
#[derive(Clone)]
pub(crate) struct Registration {
    pub event: String,
    pub listener: Listener,
}

impl Registration {
    pub fn is(&self, event: &str, listener: &Listener) -> bool {
        self.event == event && same_listener(&self.listener, listener)
    }
}
