//! Tree reconciliation.
//!
//! [`similar`] decides whether a live node can stand for a template node;
//! [`diff`] uses it to patch a live tree in place; [`patch`] runs a whole
//! render's worth of both and sweeps directive attributes afterwards.

pub mod patch;
pub mod similar;

pub use patch::{IgnoreFlags, PatchStats, diff, patch, strip_directives};
pub use similar::similar;
