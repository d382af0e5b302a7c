//! Permanent event handlers.
//!
//! A permanent handler is a `(selector, event, listener)` triple that should
//! stay attached to whatever elements match the selector, across renders that
//! may replace those elements. The renderer detaches every handler before a
//! patch and reattaches them to the new matches afterwards.

use tracing::trace;

use crate::dom::{Document, DomError, Listener, Selector, same_listener};

struct Handler {
    selector: Selector,
    event: String,
    listener: Listener,
}

impl Handler {
    fn is(&self, selector: &str, event: &str, listener: &Listener) -> bool {
        self.selector.as_str() == selector
            && self.event == event
            && same_listener(&self.listener, listener)
    }

    fn attach(&self, doc: &mut Document) -> usize {
        let mut attached = 0;
        for node in doc.query_selector_all(&self.selector) {
            if doc.add_listener(node, &self.event, self.listener.clone()) {
                attached += 1;
            }
        }
        attached
    }

    fn detach(&self, doc: &mut Document) -> usize {
        let mut detached = 0;
        for node in doc.query_selector_all(&self.selector) {
            if doc.remove_listener(node, &self.event, &self.listener) {
                detached += 1;
            }
        }
        detached
    }
}

/// The permanent handlers of one renderer.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and attaches it to the current matches.
    ///
    /// Returns `Ok(false)` if the exact triple is already registered.
    pub fn add(
        &mut self,
        doc: &mut Document,
        selector: &str,
        event: &str,
        listener: Listener,
    ) -> Result<bool, DomError> {
        if self.handlers.iter().any(|h| h.is(selector, event, &listener)) {
            return Ok(false);
        }
        let handler = Handler {
            selector: Selector::parse(selector)?,
            event: event.to_string(),
            listener,
        };
        let attached = handler.attach(doc);
        trace!(selector, event, attached, "permanent handler added");
        self.handlers.push(handler);
        Ok(true)
    }

    /// Unregisters handlers for `selector` and detaches them.
    ///
    /// Without `event` every handler for the selector goes; without
    /// `listener` every handler for that event goes. Returns true if anything
    /// was removed.
    pub fn remove(
        &mut self,
        doc: &mut Document,
        selector: &str,
        event: Option<&str>,
        listener: Option<&Listener>,
    ) -> bool {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.handlers).into_iter().partition(|h| {
                h.selector.as_str() == selector
                    && event.is_none_or(|e| h.event == e)
                    && listener.is_none_or(|l| same_listener(&h.listener, l))
            });
        self.handlers = kept;
        for handler in &removed {
            handler.detach(doc);
        }
        trace!(selector, ?event, removed = removed.len(), "permanent handlers removed");
        !removed.is_empty()
    }

    /// Detaches every handler from its current matches.
    pub fn detach_all(&self, doc: &mut Document) -> usize {
        self.handlers.iter().map(|h| h.detach(doc)).sum()
    }

    /// Attaches every handler to its current matches.
    pub fn attach_all(&self, doc: &mut Document) -> usize {
        self.handlers.iter().map(|h| h.attach(doc)).sum()
    }

    /// Detaches and forgets every handler.
    pub fn clear(&mut self, doc: &mut Document) {
        self.detach_all(doc);
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
