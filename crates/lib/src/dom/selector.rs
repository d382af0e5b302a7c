//! CSS selectors.
//!
//! Parsing and matching are done by the `selectors` crate, the engine behind
//! Servo and `scraper`. This module supplies the pieces it needs from the
//! host: a [`SelectorImpl`](parser::SelectorImpl) with plain string atoms and
//! an [`selectors::Element`] view of arena nodes.
//!
//! Everything in Selectors Level 3 that does not depend on user interaction
//! works: combinators, attribute operators, `:not()`, `:first-child`,
//! `:nth-child()` and friends. State pseudo-classes such as `:hover` or
//! `:checked` and pseudo-elements are rejected at parse time.

use std::{
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
    str::FromStr,
};

use cssparser::ToCss;
use indextree::NodeId;
use precomputed_hash::PrecomputedHash;
use selectors::{
    NthIndexCache, OpaqueElement,
    attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint},
    matching::{
        self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
        NeedsSelectorFlags, QuirksMode,
    },
    parser::{self, ParseRelative, SelectorList, SelectorParseErrorKind},
};

use super::{document::Document, errors::DomError, node::Element};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed selector list.
#[derive(Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<HostSelectors>,
}

impl Selector {
    /// Parses a selector list.
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let mut input = cssparser::ParserInput::new(source);
        let mut css = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&HostParser, &mut css, ParseRelative::No).map_err(|err| {
            DomError::InvalidSelector {
                selector: source.to_string(),
                reason: format!("{:?} at column {}", err.kind, err.location.column),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// The selector as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the node is an element matching any selector of the
    /// list.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(element) = HostElement::wrap(doc, id) else {
            return false;
        };
        let mut nth_index_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        matching::matches_selector_list(&self.list, &element, &mut context)
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Selector {}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ===== SELECTOR VOCABULARY =====

/// Selector vocabulary of the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSelectors;

impl parser::SelectorImpl for HostSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssName;
    type LocalName = CssName;
    type NamespaceUrl = CssName;
    type NamespacePrefix = CssName;
    type BorrowedNamespaceUrl = CssName;
    type BorrowedLocalName = CssName;
    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

struct HostParser;

impl<'i> parser::Parser<'i> for HostParser {
    type Impl = HostSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// An attribute value in a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CssString(pub String);

impl From<&str> for CssString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

/// A tag, attribute, id, class or namespace name in a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CssName(pub String);

impl From<&str> for CssName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl ToCss for CssName {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssName {
    fn precomputed_hash(&self) -> u32 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish() as u32
    }
}

/// Non tree-structural pseudo-classes. The host has no interaction state, so
/// there are none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoClass {}

impl parser::NonTSPseudoClass for PseudoClass {
    type Impl = HostSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for PseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

/// Pseudo-elements. The host renders nothing, so there are none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl parser::PseudoElement for PseudoElement {
    type Impl = HostSelectors;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

// ===== ELEMENT VIEW =====

/// An element node of a [`Document`] as seen by the selector engine.
#[derive(Clone, Copy)]
struct HostElement<'a> {
    doc: &'a Document,
    id: NodeId,
    element: &'a Element,
}

impl<'a> HostElement<'a> {
    fn wrap(doc: &'a Document, id: NodeId) -> Option<Self> {
        doc.element(id).map(|element| Self { doc, id, element })
    }
}

impl fmt::Debug for HostElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {:?}", self.element.tag(), self.id)
    }
}

impl selectors::Element for HostElement<'_> {
    type Impl = HostSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.element)
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc
            .parent(self.id)
            .and_then(|parent| Self::wrap(self.doc, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.id
            .preceding_siblings(self.doc.arena())
            .skip(1)
            .find_map(|sibling| Self::wrap(self.doc, sibling))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.id
            .following_siblings(self.doc.arena())
            .skip(1)
            .find_map(|sibling| Self::wrap(self.doc, sibling))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.id
            .children(self.doc.arena())
            .find_map(|child| Self::wrap(self.doc, child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssName) -> bool {
        self.element.tag() == local_name.0
    }

    fn has_namespace(&self, ns: &CssName) -> bool {
        ns.0.is_empty() || ns.0 == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.element.tag() == other.element.tag()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssName>,
        local_name: &CssName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        let in_namespace = match ns {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::Specific(url) => url.0.is_empty(),
        };
        in_namespace
            && self
                .element
                .attr(&local_name.0)
                .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &PseudoClass,
        _context: &mut MatchingContext<'_, HostSelectors>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, HostSelectors>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.element.tag(), "a" | "area" | "link") && self.element.has_attr("href")
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssName, case_sensitivity: CaseSensitivity) -> bool {
        self.element
            .attr("id")
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssName, case_sensitivity: CaseSensitivity) -> bool {
        self.element
            .classes()
            .any(|class| case_sensitivity.eq(class.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &CssName) -> Option<CssName> {
        None
    }

    fn is_part(&self, _name: &CssName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.id.children(self.doc.arena()).all(|child| {
            !self.doc.is_element(child) && self.doc.text_content(child).is_empty()
        })
    }

    fn is_root(&self) -> bool {
        self.doc.parent(self.id) == Some(self.doc.root())
    }
}
