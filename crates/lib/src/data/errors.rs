//! Error types for data store operations.
//!
//! Reads never fail: a missing or non-navigable path is simply `None`. These
//! errors only come out of writes, where the caller asked to create or replace
//! something the store cannot reach.

use thiserror::Error;

/// Structured error types for data store writes.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    /// The empty path addresses the whole snapshot and cannot be assigned.
    #[error("Cannot set the empty path")]
    EmptyPath,

    /// A path step hit a value that cannot hold children (a primitive), or a
    /// sequence step whose component is not an index.
    #[error("Path '{path}' is not navigable at component '{component}' ({kind})")]
    NotNavigable {
        path: String,
        component: String,
        kind: &'static str,
    },

    /// A path step tried to write into (or through) a Set. Sets are readable by
    /// position but never auto-vivified or assigned.
    #[error("Path '{path}' cannot be written through a set at component '{component}'")]
    SetNotWritable { path: String, component: String },
}

impl DataError {
    /// Check if this error is a plain navigation failure.
    pub fn is_not_navigable(&self) -> bool {
        matches!(self, DataError::NotNavigable { .. })
    }

    /// Check if this error was caused by a Set in the write chain.
    pub fn is_set_write(&self) -> bool {
        matches!(self, DataError::SetNotWritable { .. })
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            DataError::NotNavigable { path, .. } | DataError::SetNotWritable { path, .. } => {
                Some(path)
            }
            DataError::EmptyPath => None,
        }
    }

    /// Get the failing component if this is a path-related error
    pub fn component(&self) -> Option<&str> {
        match self {
            DataError::NotNavigable { component, .. }
            | DataError::SetNotWritable { component, .. } => Some(component),
            DataError::EmptyPath => None,
        }
    }
}

// Conversion from DataError to the main Error type
impl From<DataError> for crate::Error {
    fn from(err: DataError) -> Self {
        crate::Error::Data(err)
    }
}
