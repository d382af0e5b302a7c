//! HTML serialization through html5ever's serializer.
//!
//! The arena is walked into html5ever's [`Serializer`] calls, so escaping,
//! void elements and raw text elements follow html5ever's rules.

use std::io;

use html5ever::{
    LocalName, QualName, namespace_url, ns,
    serialize::{self, Serialize, SerializeOpts, Serializer, TraversalScope},
};
use indextree::NodeId;
use tracing::warn;

use super::{document::Document, node::NodeData};

impl Document {
    /// Markup of a node including the node itself.
    pub fn outer_html(&self, id: NodeId) -> String {
        self.to_html(id, TraversalScope::IncludeNode)
    }

    /// Markup of a node's children.
    pub fn inner_html(&self, id: NodeId) -> String {
        let parent = self.tag_name(id).map(html_name);
        self.to_html(id, TraversalScope::ChildrenOnly(parent))
    }

    fn to_html(&self, id: NodeId, traversal_scope: TraversalScope) -> String {
        let mut out = Vec::new();
        let opts = SerializeOpts {
            traversal_scope,
            ..SerializeOpts::default()
        };
        if let Err(err) = serialize::serialize(&mut out, &Subtree { doc: self, node: id }, opts) {
            warn!(%err, "html serialization failed");
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

/// A node of a document and everything below it.
struct Subtree<'a> {
    doc: &'a Document,
    node: NodeId,
}

enum Step {
    Open(NodeId),
    Close(QualName),
}

impl Serialize for Subtree<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let children = |id: NodeId| self.doc.children(id).into_iter().rev().map(Step::Open);
        let mut steps: Vec<Step> = match traversal_scope {
            TraversalScope::IncludeNode => vec![Step::Open(self.node)],
            TraversalScope::ChildrenOnly(_) => children(self.node).collect(),
        };

        while let Some(step) = steps.pop() {
            match step {
                Step::Open(id) => match self.doc.node(id) {
                    Some(NodeData::Element(element)) => {
                        let name = html_name(element.tag());
                        let attr_names: Vec<QualName> = element
                            .attrs()
                            .iter()
                            .map(|attr| QualName::new(None, ns!(), LocalName::from(attr.name.as_str())))
                            .collect();
                        serializer.start_elem(
                            name.clone(),
                            attr_names
                                .iter()
                                .zip(element.attrs())
                                .map(|(qual, attr)| (qual, attr.value.as_str())),
                        )?;
                        steps.push(Step::Close(name));
                        steps.extend(children(id));
                    }
                    Some(NodeData::Text(text)) => serializer.write_text(text)?,
                    Some(NodeData::Root) => steps.extend(children(id)),
                    None => {}
                },
                Step::Close(name) => serializer.end_elem(name)?,
            }
        }
        Ok(())
    }
}
