//! Node payloads stored in a [`Document`](super::Document) arena.

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root, parent of top-level nodes.
    Root,
    /// An element with a tag and attributes.
    Element,
    /// A text node.
    Text,
}

/// Data carried by one tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root
    Root,
    /// An element
    Element(Element),
    /// A text node
    Text(String),
}

impl NodeData {
    /// Returns the kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Root => NodeKind::Root,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        }
    }

    /// Attempts to view this node as an element
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Attempts to view this node as a mutable element
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Attempts to view this node as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element: lower-cased tag name plus ordered, uniquely named attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<Attribute>,
}

impl Element {
    /// Creates an element without attributes. Tag names are case-insensitive
    /// and stored lower-cased.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// The lower-cased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns true if the attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Sets an attribute, keeping its position if it already exists.
    /// Returns true if the element changed.
    pub fn set_attr(&mut self, name: &str, value: &str) -> bool {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) if attr.value == value => false,
            Some(attr) => {
                attr.value = value.to_string();
                true
            }
            None => {
                self.attrs.push(Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                });
                true
            }
        }
    }

    /// Removes an attribute. Returns true if it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        self.attrs.len() != before
    }

    /// The `id` attribute, or the empty string.
    pub fn id(&self) -> &str {
        self.attr("id").unwrap_or("")
    }

    /// Whitespace separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    /// Returns true if both elements carry the same attributes, ignoring order.
    pub fn same_attributes(&self, other: &Element) -> bool {
        self.attrs.len() == other.attrs.len()
            && self
                .attrs
                .iter()
                .all(|a| other.attr(&a.name) == Some(a.value.as_str()))
    }
}
