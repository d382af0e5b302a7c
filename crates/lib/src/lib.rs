//!
//! Myopie: a small reactive template renderer.
//! This library keeps one mount point in a live node tree synchronized with the
//! markup a template function produces from a data object, disturbing the
//! existing tree as little as possible.
//!
//! ## Core Concepts
//!
//! * **Data (`data::DataStore`)**: The path-addressable data graph the template is rendered from, with the `previous` snapshot hooks compare against.
//! * **Host tree (`dom::Document`, `dom::Page`)**: An arena-backed node tree parsed from HTML, plus the shared live page with event listeners.
//! * **Differ (`diff::diff`)**: Reconciles a freshly parsed template tree onto the live tree in place, reusing similar nodes and honouring directive attributes:
//!     * `data-myopie-ignore-content="true"` leaves an element's content alone.
//!     * `data-myopie-ignore-style="true"` leaves `style` alone.
//!     * `data-myopie-default-<name>` sets `<name>` only when missing.
//!     * `data-myopie-id` identifies an element across renders like `id`.
//! * **Renderer (`render::Renderer`)**: Turns `set` calls into (debounced) renders and sequences the init/render hooks around each patch.

pub mod constants;
pub mod data;
pub mod diff;
pub mod dom;
pub mod render;

pub use data::{DataStore, Value};
pub use dom::{Document, Page};
pub use render::{Options, Renderer};

/// Result type used throughout the Myopie library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Myopie library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured data store errors from the data module
    #[error(transparent)]
    Data(data::DataError),

    /// Structured host tree errors from the dom module
    #[error(transparent)]
    Dom(dom::DomError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Data(_) => "data",
            Error::Dom(_) => "dom",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is data store related.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::Data(_))
    }

    /// Check if this error indicates a path could not be navigated.
    pub fn is_not_navigable(&self) -> bool {
        match self {
            Error::Data(data_err) => data_err.is_not_navigable(),
            _ => false,
        }
    }

    /// Check if this error is a rejected write into a set.
    pub fn is_set_write(&self) -> bool {
        match self {
            Error::Data(data_err) => data_err.is_set_write(),
            _ => false,
        }
    }

    /// Check if this error is host tree related.
    pub fn is_dom_error(&self) -> bool {
        matches!(self, Error::Dom(_))
    }

    /// Check if this error is an unparseable selector.
    pub fn is_invalid_selector(&self) -> bool {
        match self {
            Error::Dom(dom_err) => dom_err.is_invalid_selector(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
