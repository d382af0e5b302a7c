//! HTML fragment parsing.
//!
//! Markup is parsed by html5ever as a fragment in `<body>` context, the way a
//! browser parses `innerHTML`, then copied into a [`Document`] arena. Comments,
//! doctypes and processing instructions are dropped.

use html5ever::{
    ParseOpts, QualName, local_name, namespace_url, ns, parse_fragment as parse_html,
    tendril::TendrilSink,
};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::{
    document::Document,
    node::{Element, NodeData},
};

/// Parses an HTML fragment into a new document. Parsing never fails; malformed
/// markup is repaired the way a browser would repair it.
pub fn parse_fragment(markup: &str) -> Document {
    let dom = parse_html(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(markup);

    let mut doc = Document::new();
    let root = doc.root();
    // Fragment parsing wraps its output in a synthetic <html> element.
    for context in dom.document.children.borrow().iter() {
        for child in context.children.borrow().iter() {
            copy_node(&mut doc, root, child);
        }
    }
    doc
}

fn copy_node(doc: &mut Document, parent: NodeId, handle: &Handle) {
    match &handle.data {
        RcNodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(&name.local);
            for attr in attrs.borrow().iter() {
                let attr_name = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", &**prefix, &*attr.name.local),
                    None => attr.name.local.to_string(),
                };
                element.set_attr(&attr_name, &attr.value);
            }
            let id = doc.create(NodeData::Element(element));
            doc.append(parent, id);
            for child in handle.children.borrow().iter() {
                copy_node(doc, id, child);
            }
        }
        RcNodeData::Text { contents } => {
            doc.append_text(parent, &contents.borrow());
        }
        _ => {}
    }
}
