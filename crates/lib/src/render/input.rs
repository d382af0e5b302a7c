//! Two-way input binding.
//!
//! A renderer with input bindings listens for `input` events on the whole
//! document. When the event target matches a binding's selector, the control's
//! value is written to the binding's path.

use indextree::NodeId;

use super::options::InputBinding;
use crate::{
    data::{Path, Value},
    dom::{Document, DomError, FormValue, Selector},
};

/// Parsed input bindings, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<(Selector, Path)>,
}

impl Bindings {
    /// Parses the selectors and paths of `bindings`.
    pub fn parse(bindings: &[InputBinding]) -> Result<Self, DomError> {
        let entries = bindings
            .iter()
            .map(|b| Ok((Selector::parse(&b.selector)?, Path::parse(&b.path))))
            .collect::<Result<_, DomError>>()?;
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The path and value an input event at `target` writes, taken from the
    /// first binding whose selector matches.
    pub fn resolve(&self, doc: &Document, target: NodeId) -> Option<(Path, Value)> {
        self.entries
            .iter()
            .find(|(selector, _)| selector.matches(doc, target))
            .map(|(_, path)| (path.clone(), extract(doc, target)))
    }
}

/// The value a control holds: checkboxes and radios yield their checked state,
/// everything else its text value.
pub fn extract(doc: &Document, target: NodeId) -> Value {
    match doc.form_value(target) {
        Some(FormValue::Checked(checked)) => Value::Bool(checked),
        Some(FormValue::Text(text)) => Value::Text(text),
        None => Value::Text(doc.get_attribute(target, "value").unwrap_or("").to_string()),
    }
}
