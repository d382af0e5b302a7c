//! In-place reconciliation of a template tree onto a live tree.
//!
//! [`diff`] walks the children of a template node and a live node side by
//! side. Live nodes that are structurally equal to their template counterpart
//! are left alone; similar ones are patched in place; dissimilar ones are
//! replaced by a similar sibling further ahead or by a fresh copy of the
//! template node. Live children beyond the template's are removed.

use std::ops::AddAssign;

use indextree::NodeId;
use serde::Serialize;
use tracing::trace;

use super::similar::similar;
use crate::{
    constants::{self, DEFAULT_PREFIX, IGNORE_CONTENT, IGNORE_STYLE},
    dom::{Document, NodeKind},
};

/// Tags whose `value`, `selected` and `checked` attributes carry live form
/// state once set.
const FORM_TAGS: &[&str] = &["input", "option", "textarea"];
const FORM_ATTRS: &[&str] = &["value", "selected", "checked"];

/// Directive state inherited by a subtree. Copied into every recursion, so a
/// directive on one element never affects its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreFlags {
    /// Leave children and text alone.
    pub content: bool,
    /// Leave the `style` attribute alone.
    pub style: bool,
}

impl IgnoreFlags {
    /// These flags updated with the directives a template element carries.
    fn with_directives(self, template: &Document, node: NodeId) -> Self {
        let enabled = |name: &str| template.get_attribute(node, name) == Some("true");
        Self {
            content: self.content || enabled(IGNORE_CONTENT),
            style: self.style || enabled(IGNORE_STYLE),
        }
    }
}

/// Mutations performed by one patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatchStats {
    /// Template nodes copied into the live tree.
    pub inserted: usize,
    /// Live nodes moved back from further ahead.
    pub moved: usize,
    /// Live nodes removed by tail truncation.
    pub removed: usize,
    /// Text contents replaced.
    pub text_updates: usize,
    /// Attributes added or changed.
    pub attrs_set: usize,
    /// Attributes removed, directives included.
    pub attrs_removed: usize,
    /// Elements whose children were cleared at once.
    pub cleared: usize,
}

impl PatchStats {
    /// Returns true if the patch did not touch the live tree.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Total number of mutations.
    pub fn total(&self) -> usize {
        self.inserted
            + self.moved
            + self.removed
            + self.text_updates
            + self.attrs_set
            + self.attrs_removed
            + self.cleared
    }
}

impl AddAssign for PatchStats {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.moved += other.moved;
        self.removed += other.removed;
        self.text_updates += other.text_updates;
        self.attrs_set += other.attrs_set;
        self.attrs_removed += other.attrs_removed;
        self.cleared += other.cleared;
    }
}

/// Reconciles the children of `template_parent` onto the children of
/// `live_parent`.
pub fn diff(
    template: &Document,
    template_parent: NodeId,
    live: &mut Document,
    live_parent: NodeId,
    flags: IgnoreFlags,
    stats: &mut PatchStats,
) {
    let template_children = template.children(template_parent);
    for (index, &template_child) in template_children.iter().enumerate() {
        let existing = live.children(live_parent);
        let Some(&current) = existing.get(index) else {
            trace!(index, "appending template node");
            insert_copy(template, template_child, live, live_parent, None, stats);
            continue;
        };

        if live.is_equal_node(current, template, template_child) {
            continue;
        }

        let node = if similar(template, template_child, live, current) {
            current
        } else {
            let ahead = existing[index + 1..]
                .iter()
                .copied()
                .find(|candidate| similar(template, template_child, live, *candidate));
            match ahead {
                Some(ahead) => {
                    trace!(index, "moving similar node back from ahead");
                    live.insert_before(live_parent, ahead, Some(current));
                    stats.moved += 1;
                    ahead
                }
                None => {
                    trace!(index, "inserting template node");
                    insert_copy(template, template_child, live, live_parent, Some(current), stats);
                    continue;
                }
            }
        };

        reconcile(template, template_child, live, node, flags, stats);
    }

    let existing = live.children(live_parent);
    for extra in existing.into_iter().skip(template_children.len()) {
        live.remove(extra);
        stats.removed += 1;
    }
}

/// Copies a template node into the live tree before `reference` (or at the
/// end), applying its default attributes on the way.
fn insert_copy(
    template: &Document,
    template_node: NodeId,
    live: &mut Document,
    live_parent: NodeId,
    reference: Option<NodeId>,
    stats: &mut PatchStats,
) {
    let Some(copy) = live.import(template, template_node) else {
        return;
    };
    stats.attrs_set += apply_defaults(live, copy);
    live.insert_before(live_parent, copy, reference);
    stats.inserted += 1;
}

/// Applies `data-myopie-default-*` directives of a freshly copied subtree.
fn apply_defaults(live: &mut Document, node: NodeId) -> usize {
    let mut applied = 0;
    let mut nodes = vec![node];
    nodes.extend(live.descendants(node));
    for id in nodes {
        for attr in live.attributes(id) {
            let Some(real_name) = default_target(&attr.name) else {
                continue;
            };
            if !live.has_attribute(id, real_name) {
                live.set_attribute(id, real_name, &attr.value);
                applied += 1;
            }
        }
    }
    applied
}

/// The attribute a `data-myopie-default-*` directive provides a default for.
fn default_target(name: &str) -> Option<&str> {
    name.strip_prefix(DEFAULT_PREFIX)
        .filter(|real_name| !real_name.is_empty())
}

/// Text a node stands for when it has no children; `None` otherwise.
fn own_text(doc: &Document, node: NodeId) -> Option<String> {
    (!doc.has_child_nodes(node)).then(|| doc.text_content(node))
}

/// Patches the live node `node` so it matches `template_node`.
fn reconcile(
    template: &Document,
    template_node: NodeId,
    live: &mut Document,
    node: NodeId,
    flags: IgnoreFlags,
    stats: &mut PatchStats,
) {
    let is_element = template.kind(template_node) == Some(NodeKind::Element);
    let flags = if is_element {
        flags.with_directives(template, template_node)
    } else {
        flags
    };

    if !flags.content {
        let wanted = own_text(template, template_node);
        if wanted != own_text(live, node) {
            live.set_text_content(node, wanted.as_deref().unwrap_or(""));
            stats.text_updates += 1;
        }
    }

    if !is_element {
        return;
    }

    merge_attributes(template, template_node, live, node, flags, stats);

    if flags.content {
        return;
    }
    if !template.has_child_nodes(template_node) && live.has_child_nodes(node) {
        live.clear_children(node);
        stats.cleared += 1;
    } else {
        diff(template, template_node, live, node, flags, stats);
    }
}

fn merge_attributes(
    template: &Document,
    template_node: NodeId,
    live: &mut Document,
    node: NodeId,
    flags: IgnoreFlags,
    stats: &mut PatchStats,
) {
    let tag = live.tag_name(node).unwrap_or_default().to_string();
    let protects_form_state = FORM_TAGS.contains(&tag.as_str());
    let mut defaulted = Vec::new();

    for attr in template.attributes(template_node) {
        if let Some(real_name) = default_target(&attr.name) {
            if !live.has_attribute(node, real_name) {
                live.set_attribute(node, real_name, &attr.value);
                stats.attrs_set += 1;
            }
            defaulted.push(real_name.to_string());
            continue;
        }
        if constants::is_directive(&attr.name) {
            continue;
        }
        let present = live.has_attribute(node, &attr.name);
        let protected = (flags.style && attr.name == "style")
            || (protects_form_state && FORM_ATTRS.contains(&attr.name.as_str()));
        if protected && present {
            continue;
        }
        if live.set_attribute(node, &attr.name, &attr.value) {
            stats.attrs_set += 1;
        }
    }

    for attr in live.attributes(node) {
        if template.has_attribute(template_node, &attr.name)
            || defaulted.contains(&attr.name)
            || (flags.style && attr.name == "style")
        {
            continue;
        }
        live.remove_attribute(node, &attr.name);
        stats.attrs_removed += 1;
    }
}

/// Removes every directive attribute below `node`. Returns how many were
/// removed.
pub fn strip_directives(live: &mut Document, node: NodeId) -> usize {
    let mut removed = 0;
    for id in live.descendants(node) {
        for attr in live.attributes(id) {
            if constants::is_directive(&attr.name) {
                live.remove_attribute(id, &attr.name);
                removed += 1;
            }
        }
    }
    removed
}

/// Reconciles a whole template document onto the children of `mount` and
/// strips directives afterwards.
pub fn patch(template: &Document, live: &mut Document, mount: NodeId) -> PatchStats {
    let mut stats = PatchStats::default();
    diff(
        template,
        template.root(),
        live,
        mount,
        IgnoreFlags::default(),
        &mut stats,
    );
    stats.attrs_removed += strip_directives(live, mount);
    stats
}
