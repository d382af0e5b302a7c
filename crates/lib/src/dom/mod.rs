//! The host node tree.
//!
//! # Core Types
//!
//! - [`Document`] - an arena of elements and text with DOM-like operations
//! - [`Selector`] - a CSS selector list used to locate nodes
//! - [`Page`] - the shared live document plus event dispatch
//!
//! Markup becomes a [`Document`] through [`parse_fragment`]; documents turn
//! back into markup through [`Document::outer_html`] and
//! [`Document::inner_html`].

pub mod document;
pub mod errors;
pub mod events;
pub mod node;
pub mod page;
pub mod parse;
pub mod selector;
mod serialize;

pub use document::{Document, FormValue};
pub use errors::DomError;
pub use events::{Event, Listener, listener, same_listener};
pub use indextree::NodeId;
pub use node::{Attribute, Element, NodeData, NodeKind};
pub use page::Page;
pub use parse::parse_fragment;
pub use selector::Selector;
