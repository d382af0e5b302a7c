//! Node similarity.
//!
//! Decides whether a live node can stand for a template node across a
//! re-render (and be patched in place) or has to be replaced outright.

use indextree::NodeId;

use crate::{
    constants::{self, KEY_ATTR},
    dom::{Document, Element, NodeData},
};

type Comparator = fn(&Element, &Element) -> bool;

/// Tag-specific comparators. A tag listed here is decided by its comparator
/// alone.
static COMPARATORS: &[(&str, Comparator)] = &[
    ("input", same_input),
    ("img", same_src),
    ("script", same_src),
    ("a", same_href),
    ("link", same_href),
];

fn same_attr(a: &Element, b: &Element, name: &str) -> bool {
    a.attr(name) == b.attr(name)
}

fn same_input(a: &Element, b: &Element) -> bool {
    same_attr(a, b, "type") && same_attr(a, b, "name")
}

fn same_src(a: &Element, b: &Element) -> bool {
    same_attr(a, b, "src")
}

fn same_href(a: &Element, b: &Element) -> bool {
    same_attr(a, b, "href")
}

fn comparator(tag: &str) -> Option<Comparator> {
    COMPARATORS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, compare)| *compare)
}

/// Sorted `data-*` attributes that are not in the library's own namespace.
fn data_attributes(element: &Element) -> Vec<(&str, &str)> {
    let mut attrs: Vec<_> = element
        .attrs()
        .iter()
        .filter(|a| a.name.starts_with("data-") && !constants::is_internal(&a.name))
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    attrs.sort_unstable();
    attrs
}

fn sorted_classes(element: &Element) -> Vec<&str> {
    let mut classes: Vec<_> = element.classes().collect();
    classes.sort_unstable();
    classes
}

/// Outcome of comparing one identity attribute.
enum Identity {
    Same,
    Different,
    Unknown,
}

fn identity(a: &Element, b: &Element, name: &str) -> Identity {
    let ours = a.attr(name).unwrap_or("");
    let theirs = b.attr(name).unwrap_or("");
    if ours != theirs {
        Identity::Different
    } else if ours.is_empty() {
        Identity::Unknown
    } else {
        Identity::Same
    }
}

/// Returns true if the live node `existing` can be patched into the template
/// node `template` instead of being replaced.
///
/// Checks run in order and the first decisive one wins:
/// 1. kinds and tags must match; `id` and `data-myopie-id` must match, and a
///    matching non-empty one makes the nodes similar
/// 2. tags with a comparator (`input`, `img`, `script`, `a`, `link`) use it
/// 3. if either side has `data-*` attributes, those must be equal
/// 4. if both sides have classes, the class lists must be equal
/// 5. otherwise the child element counts must be equal
///
/// Two text nodes are always similar.
pub fn similar(
    template_doc: &Document,
    template: NodeId,
    live_doc: &Document,
    existing: NodeId,
) -> bool {
    let (a, b) = match (template_doc.node(template), live_doc.node(existing)) {
        (Some(NodeData::Element(a)), Some(NodeData::Element(b))) => (a, b),
        (Some(NodeData::Text(_)), Some(NodeData::Text(_))) => return true,
        (Some(NodeData::Root), Some(NodeData::Root)) => return true,
        _ => return false,
    };
    if a.tag() != b.tag() {
        return false;
    }

    let mut identified = false;
    for name in ["id", KEY_ATTR] {
        match identity(a, b, name) {
            Identity::Different => return false,
            Identity::Same => identified = true,
            Identity::Unknown => {}
        }
    }
    if identified {
        return true;
    }

    if let Some(compare) = comparator(a.tag()) {
        return compare(a, b);
    }

    let (data_a, data_b) = (data_attributes(a), data_attributes(b));
    if !data_a.is_empty() || !data_b.is_empty() {
        return data_a == data_b;
    }

    let (classes_a, classes_b) = (sorted_classes(a), sorted_classes(b));
    if !classes_a.is_empty() && !classes_b.is_empty() {
        return classes_a == classes_b;
    }

    template_doc.child_element_count(template) == live_doc.child_element_count(existing)
}
