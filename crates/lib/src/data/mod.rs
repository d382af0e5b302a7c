//! The data store: values, paths and container-aware navigation.
//!
//! # Core Types
//!
//! - [`Value`] - the JSON-like graph templates are rendered from
//! - [`Path`] - slash-delimited, backslash-escapable address into a value
//! - [`DataStore`] - current/previous snapshots with path-based get/set
//! - [`ContainerKind`] - the container kinds a path can step through

pub mod errors;
pub mod navigate;
pub mod path;
pub mod store;
pub mod value;

pub use errors::DataError;
pub use navigate::ContainerKind;
pub use path::Path;
pub use store::{DataStore, SetOutcome};
pub use value::{Computed, Object, RegExp, Value};
