//! Arena-backed node tree.
//!
//! A [`Document`] owns every node it contains in an [`indextree::Arena`] and is
//! addressed through [`NodeId`]s. Nodes can be detached, moved and re-inserted
//! without losing their identity, which is what lets the differ reuse live
//! nodes (and the listeners attached to them) across renders.
//!
//! Node ids are only meaningful for the document that issued them. Operations
//! given an unknown or removed id are no-ops returning the neutral value.

use std::{collections::HashMap, fmt};

use indextree::{Arena, NodeId};
use tracing::warn;

use super::{
    events::{Listener, Registration},
    node::{Attribute, Element, NodeData, NodeKind},
    selector::Selector,
};

/// Value a form control currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Checkbox or radio state.
    Checked(bool),
    /// Text of any other control.
    Text(String),
}

/// What the user typed or toggled into a control. Kept apart from the
/// `value` and `checked` attributes, which only hold the control's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DirtyState {
    value: Option<String>,
    checked: Option<bool>,
}

/// A tree of elements and text under a single root node.
#[derive(Clone)]
pub struct Document {
    arena: Arena<NodeData>,
    root: NodeId,
    listeners: HashMap<NodeId, Vec<Registration>>,
    document_listeners: Vec<Registration>,
    dirty: HashMap<NodeId, DirtyState>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("html", &self.inner_html(self.root))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::Root);
        Self {
            arena,
            root,
            listeners: HashMap::new(),
            document_listeners: Vec::new(),
            dirty: HashMap::new(),
        }
    }

    /// Parses an HTML fragment into a new document.
    pub fn parse(markup: &str) -> Self {
        super::parse::parse_fragment(markup)
    }

    /// The root node. Top-level nodes of the markup are its children.
    pub fn root(&self) -> NodeId {
        self.root
    }

    // ===== NODE ACCESS =====

    pub(crate) fn arena(&self) -> &Arena<NodeData> {
        &self.arena
    }

    /// The data of a live node.
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get_mut())
    }

    /// Returns true if `id` names a node of this document that was not removed.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if the node is attached below the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && id.ancestors(&self.arena).any(|a| a == self.root)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(NodeData::kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(NodeData::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).and_then(NodeData::as_element_mut)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lower-cased tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    // ===== TREE STRUCTURE =====

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        self.arena[id].parent()
    }

    /// Child nodes in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    /// The child at `index`, if any.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        id.children(&self.arena).nth(index)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        id.children(&self.arena).count()
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.contains(id) && self.arena[id].first_child().is_some()
    }

    /// Element children in order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .into_iter()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).len()
    }

    /// Nodes below `id` in document order, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.descendants(&self.arena).skip(1).collect()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(NodeData::Element(Element::new(tag)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Text(text.to_string()))
    }

    pub(crate) fn create(&mut self, data: NodeData) -> NodeId {
        self.arena.new_node(data)
    }

    /// Appends `child` as the last child of `parent`, detaching it from
    /// wherever it was first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        if let Err(err) = parent.checked_append(child, &mut self.arena) {
            warn!(%err, "append rejected");
        }
    }

    /// Appends a new text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.append(parent, id);
        id
    }

    /// Inserts `child` under `parent` before `reference`, or appends it when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let reference = reference.filter(|r| *r != child && self.parent(*r) == Some(parent));
        match reference {
            Some(reference) if self.contains(child) => {
                if let Err(err) = reference.checked_insert_before(child, &mut self.arena) {
                    warn!(%err, "insert rejected");
                }
            }
            Some(_) => {}
            None => self.append(parent, child),
        }
    }

    /// Detaches a node from its parent, keeping it (and its listeners) alive.
    pub fn detach(&mut self, id: NodeId) {
        if self.contains(id) && id != self.root {
            id.detach(&mut self.arena);
        }
    }

    /// Removes a node and everything below it, dropping their listeners.
    /// Removing the root clears it instead.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            self.clear_children(id);
            return;
        }
        if !self.contains(id) {
            return;
        }
        for node in id.descendants(&self.arena) {
            self.listeners.remove(&node);
            self.dirty.remove(&node);
        }
        id.remove_subtree(&mut self.arena);
    }

    /// Removes all children of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.remove(child);
        }
    }

    /// Deep-copies a node of `source` into this document. The copy is detached
    /// and carries no listeners.
    pub fn import(&mut self, source: &Document, node: NodeId) -> Option<NodeId> {
        let items = source.snapshot(node);
        self.instantiate(items)
    }

    /// Deep-copies a node within this document. The copy is detached.
    pub fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        let items = self.snapshot(node);
        self.instantiate(items)
    }

    /// Pre-order copy of a subtree as `(parent position, data)` pairs.
    fn snapshot(&self, node: NodeId) -> Vec<(Option<usize>, NodeData)> {
        let mut items = Vec::new();
        let mut stack = vec![(None, node)];
        while let Some((parent, id)) = stack.pop() {
            let Some(data) = self.node(id) else {
                continue;
            };
            let position = items.len();
            items.push((parent, data.clone()));
            let children: Vec<_> = id.children(&self.arena).collect();
            stack.extend(children.into_iter().rev().map(|c| (Some(position), c)));
        }
        items
    }

    fn instantiate(&mut self, items: Vec<(Option<usize>, NodeData)>) -> Option<NodeId> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(items.len());
        for (parent, data) in items {
            let id = self.arena.new_node(data);
            if let Some(parent) = parent.and_then(|p| ids.get(p).copied()) {
                self.append(parent, id);
            }
            ids.push(id);
        }
        ids.first().copied()
    }

    // ===== ATTRIBUTES =====

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_attr(name))
    }

    /// Sets an attribute on an element. Returns true if it changed.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        self.element_mut(id)
            .is_some_and(|el| el.set_attr(name, value))
    }

    /// Removes an attribute from an element. Returns true if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id).is_some_and(|el| el.remove_attr(name))
    }

    /// Current attributes of an element, copied so the caller can mutate the
    /// element while walking them.
    pub fn attributes(&self, id: NodeId) -> Vec<Attribute> {
        self.element(id)
            .map(|el| el.attrs().to_vec())
            .unwrap_or_default()
    }

    /// The `id` attribute, or the empty string.
    pub fn id_attr(&self, id: NodeId) -> &str {
        self.element(id).map(Element::id).unwrap_or("")
    }

    pub fn class_list(&self, id: NodeId) -> Vec<&str> {
        self.element(id)
            .map(|el| el.classes().collect())
            .unwrap_or_default()
    }

    // ===== TEXT =====

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(NodeData::Text(text)) => text.clone(),
            Some(_) => id
                .descendants(&self.arena)
                .filter_map(|n| self.arena[n].get().as_text())
                .collect(),
            None => String::new(),
        }
    }

    /// Replaces a text node's text, or an element's children with one text
    /// node (none when `text` is empty).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        match self.node_mut(id) {
            Some(NodeData::Text(current)) => {
                *current = text.to_string();
            }
            Some(_) => {
                self.clear_children(id);
                if !text.is_empty() {
                    self.append_text(id, text);
                }
            }
            None => {}
        }
    }

    // ===== COMPARISON =====

    /// Structural equality like DOM `isEqualNode`: same kind, tag, attribute
    /// set (in any order), text, and pairwise equal children.
    pub fn is_equal_node(&self, id: NodeId, other: &Document, other_id: NodeId) -> bool {
        let (Some(a), Some(b)) = (self.node(id), other.node(other_id)) else {
            return false;
        };
        let same = match (a, b) {
            (NodeData::Root, NodeData::Root) => true,
            (NodeData::Text(a), NodeData::Text(b)) => a == b,
            (NodeData::Element(a), NodeData::Element(b)) => {
                a.tag() == b.tag() && a.same_attributes(b)
            }
            _ => false,
        };
        if !same {
            return false;
        }
        let mut ours = id.children(&self.arena);
        let mut theirs = other_id.children(&other.arena);
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if self.is_equal_node(a, other, b) => {}
                _ => return false,
            }
        }
    }

    // ===== SELECTORS =====

    /// Returns true if the element matches the selector.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// First connected element matching the selector, in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        self.root
            .descendants(&self.arena)
            .skip(1)
            .find(|id| selector.matches(self, *id))
    }

    /// All connected elements matching the selector, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.root
            .descendants(&self.arena)
            .skip(1)
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    // ===== FORM STATE =====

    /// The value a form control currently holds. `None` for anything that is
    /// not an `input`, `select` or `textarea`.
    ///
    /// Typed values and toggled states win over the control's attributes and
    /// text, so re-rendering a control never loses what the user entered.
    pub fn form_value(&self, id: NodeId) -> Option<FormValue> {
        let element = self.element(id)?;
        let dirty = self.dirty.get(&id);
        let typed = dirty.and_then(|d| d.value.clone());
        match element.tag() {
            "input" if is_checkable(element) => Some(FormValue::Checked(
                dirty
                    .and_then(|d| d.checked)
                    .unwrap_or_else(|| element.has_attr("checked")),
            )),
            "input" => Some(FormValue::Text(
                typed.unwrap_or_else(|| element.attr("value").unwrap_or("").to_string()),
            )),
            "textarea" => Some(FormValue::Text(
                typed.unwrap_or_else(|| self.text_content(id)),
            )),
            "select" => Some(FormValue::Text(typed.unwrap_or_else(|| {
                let options = self.options(id);
                let chosen = options
                    .iter()
                    .find(|o| self.has_attribute(**o, "selected"))
                    .or(options.first());
                chosen.map(|o| self.option_value(*o)).unwrap_or_default()
            }))),
            _ => None,
        }
    }

    /// Stores typed text in a form control. Returns true if it changed.
    pub fn set_form_value(&mut self, id: NodeId, value: &str) -> bool {
        match self.form_value(id) {
            Some(FormValue::Text(current)) => {
                self.dirty.entry(id).or_default().value = Some(value.to_string());
                current != value
            }
            _ => false,
        }
    }

    /// Checks or unchecks a checkbox or radio. Returns true if it changed.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> bool {
        match self.form_value(id) {
            Some(FormValue::Checked(current)) => {
                self.dirty.entry(id).or_default().checked = Some(checked);
                current != checked
            }
            _ => false,
        }
    }

    fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|n| self.tag_name(*n) == Some("option"))
            .collect()
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.get_attribute(option, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option),
        }
    }

    // ===== LISTENERS =====

    /// Registers a listener on a node. Returns false if this exact
    /// `(event, listener)` pair is already registered there.
    pub fn add_listener(&mut self, id: NodeId, event: &str, listener: Listener) -> bool {
        if !self.contains(id) {
            return false;
        }
        let registrations = self.listeners.entry(id).or_default();
        if registrations.iter().any(|r| r.is(event, &listener)) {
            return false;
        }
        registrations.push(Registration {
            event: event.to_string(),
            listener,
        });
        true
    }

    /// Unregisters a listener from a node. Returns true if it was registered.
    pub fn remove_listener(&mut self, id: NodeId, event: &str, listener: &Listener) -> bool {
        let Some(registrations) = self.listeners.get_mut(&id) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|r| !r.is(event, listener));
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            self.listeners.remove(&id);
        }
        removed
    }

    /// Number of listeners registered on a node.
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.listeners.get(&id).map_or(0, Vec::len)
    }

    /// Registers a document-level listener, which sees every dispatched event
    /// after the nodes it bubbled through.
    pub fn add_document_listener(&mut self, event: &str, listener: Listener) -> bool {
        if self.document_listeners.iter().any(|r| r.is(event, &listener)) {
            return false;
        }
        self.document_listeners.push(Registration {
            event: event.to_string(),
            listener,
        });
        true
    }

    pub fn remove_document_listener(&mut self, event: &str, listener: &Listener) -> bool {
        let before = self.document_listeners.len();
        self.document_listeners.retain(|r| !r.is(event, listener));
        self.document_listeners.len() != before
    }

    /// Listeners an event dispatched at `target` reaches, in invocation order.
    pub(crate) fn propagation(&self, target: NodeId, event: &str) -> Vec<Listener> {
        if !self.contains(target) {
            return Vec::new();
        }
        target
            .ancestors(&self.arena)
            .filter_map(|node| self.listeners.get(&node))
            .flatten()
            .chain(self.document_listeners.iter())
            .filter(|r| r.event == event)
            .map(|r| r.listener.clone())
            .collect()
    }
}

fn is_checkable(element: &Element) -> bool {
    element
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio"))
}
