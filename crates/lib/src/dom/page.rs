//! The shared live page.
//!
//! A [`Page`] is a cheaply cloneable handle to one lock-protected
//! [`Document`]. Renderers patch it, listeners observe it, and tests or
//! embedders drive it by dispatching events.

use std::{
    fmt, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indextree::NodeId;
use tracing::trace;

use super::{
    document::Document,
    events::{Event, Listener},
    selector::Selector,
};

/// Shared handle to a live document.
#[derive(Clone, Default)]
pub struct Page {
    document: Arc<Mutex<Document>>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never blocks: Debug may run while a render holds the lock.
        match self.document.try_lock() {
            Ok(doc) => f.debug_struct("Page").field("document", &*doc).finish(),
            Err(_) => f.debug_struct("Page").finish_non_exhaustive(),
        }
    }
}

impl Page {
    /// Wraps a document.
    pub fn new(document: Document) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
        }
    }

    /// Parses markup into a new page.
    pub fn parse(markup: &str) -> Self {
        Self::new(Document::parse(markup))
    }

    /// Reads and parses an HTML file into a new page.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let markup = fs::read_to_string(path.as_ref())?;
        trace!(path = %path.as_ref().display(), bytes = markup.len(), "page loaded");
        Ok(Self::parse(&markup))
    }

    /// Locks the document. A panic while the lock was held does not make the
    /// page unusable.
    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if both handles refer to the same page.
    pub fn ptr_eq(&self, other: &Page) -> bool {
        Arc::ptr_eq(&self.document, &other.document)
    }

    /// First element matching `selector`.
    pub fn query_selector(&self, selector: &str) -> crate::Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.lock().query_selector(&selector))
    }

    /// Markup of the whole page.
    pub fn html(&self) -> String {
        let doc = self.lock();
        doc.inner_html(doc.root())
    }

    pub fn add_listener(&self, node: NodeId, event: &str, listener: Listener) -> bool {
        self.lock().add_listener(node, event, listener)
    }

    pub fn remove_listener(&self, node: NodeId, event: &str, listener: &Listener) -> bool {
        self.lock().remove_listener(node, event, listener)
    }

    pub fn add_document_listener(&self, event: &str, listener: Listener) -> bool {
        self.lock().add_document_listener(event, listener)
    }

    pub fn remove_document_listener(&self, event: &str, listener: &Listener) -> bool {
        self.lock().remove_document_listener(event, listener)
    }

    /// Dispatches an event at `target`. It bubbles through the target's
    /// ancestors and then reaches document listeners. Listeners run without
    /// the page lock held. Returns the number of listeners invoked.
    pub fn dispatch(&self, target: NodeId, kind: &str) -> usize {
        let listeners = self.lock().propagation(target, kind);
        trace!(event = kind, listeners = listeners.len(), "dispatching event");
        let event = Event::new(kind, target, self.clone());
        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    /// Simulates typing: stores `value` in the control and fires `input`.
    pub fn input(&self, target: NodeId, value: &str) -> usize {
        self.lock().set_form_value(target, value);
        self.dispatch(target, "input")
    }

    /// Simulates toggling a checkbox or radio and fires `input`.
    pub fn check(&self, target: NodeId, checked: bool) -> usize {
        self.lock().set_checked(target, checked);
        self.dispatch(target, "input")
    }
}
