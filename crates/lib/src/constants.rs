//! Constants used throughout the Myopie library.
//!
//! This module provides central definitions for the directive attributes
//! templates use to steer reconciliation.

/// Prefix shared by every internal attribute. Except for [`KEY_ATTR`], all
/// attributes with this prefix are directives and never reach rendered output.
pub const DIRECTIVE_PREFIX: &str = "data-myopie-";

/// Leave the element's children and text untouched when set to `"true"`.
pub const IGNORE_CONTENT: &str = "data-myopie-ignore-content";

/// Leave the element's `style` attribute untouched when set to `"true"`.
pub const IGNORE_STYLE: &str = "data-myopie-ignore-style";

/// `data-myopie-default-<name>` sets `<name>` only when the live node lacks it.
pub const DEFAULT_PREFIX: &str = "data-myopie-default-";

/// Identity key compared like `id`; copied verbatim and kept in the output.
pub const KEY_ATTR: &str = "data-myopie-id";

/// Returns true for attributes that steer reconciliation and must be stripped.
pub fn is_directive(name: &str) -> bool {
    name.starts_with(DIRECTIVE_PREFIX) && name != KEY_ATTR
}

/// Returns true for any attribute in the library's own namespace.
pub fn is_internal(name: &str) -> bool {
    name.starts_with(DIRECTIVE_PREFIX)
}
