//! The path-addressable data store behind a renderer.
//!
//! [`DataStore`] owns the current data snapshot and, between renders, the
//! `previous` snapshot render hooks compare against. `previous` is captured
//! lazily by the first `set` after a completed render and rolled back if that
//! `set` turned out not to change anything.

use tracing::trace;

use super::{
    errors::DataError,
    navigate::{self, Blocked},
    path::Path,
    value::Value,
};

/// Outcome of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOutcome {
    /// Whether the store was mutated.
    pub changed: bool,
    /// Whether this write captured the `previous` snapshot.
    pub captured_previous: bool,
}

/// Path-addressable data with a pre-edit snapshot.
///
/// ```
/// use myopie::data::{DataStore, Value};
///
/// let mut store = DataStore::new(serde_json::json!({"user": {"name": "Ada"}}));
/// assert_eq!(store.get("user/name"), Some(Value::from("Ada")));
///
/// assert!(store.set("user/tags/0", "admin").unwrap().changed);
/// assert_eq!(store.previous().and_then(|p| p.get_path("user/tags")), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    current: Value,
    previous: Option<Value>,
}

impl DataStore {
    /// Creates a store from initial data. The data is owned by the store from
    /// here on; later changes to the caller's copy are not observed.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self {
            current: initial.into(),
            previous: None,
        }
    }

    /// The live snapshot.
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// The snapshot as of the start of the current batch of edits, if any edit
    /// happened since the last completed render.
    pub fn previous(&self) -> Option<&Value> {
        self.previous.as_ref()
    }

    /// Discards the `previous` snapshot. Called once a render completes.
    pub fn clear_previous(&mut self) {
        self.previous = None;
    }

    /// Replaces the `previous` snapshot with the data a render just showed.
    /// Used when the data changed while that render ran.
    pub fn rebase_previous(&mut self, shown: Value) {
        self.previous = Some(shown);
    }

    /// Reads the value at `path`.
    ///
    /// The empty path returns the whole snapshot. Missing or non-navigable
    /// paths yield `None`. Computed values are invoked and their result
    /// returned.
    pub fn get(&self, path: impl Into<Path>) -> Option<Value> {
        let path = path.into();
        let mut current = &self.current;
        for component in path.components() {
            current = navigate::child(current, component)?;
        }
        Some(current.resolve())
    }

    /// Writes `value` at `path`, creating intermediate objects as needed.
    pub fn set(
        &mut self,
        path: impl Into<Path>,
        value: impl Into<Value>,
    ) -> Result<SetOutcome, DataError> {
        self.write(&path.into(), Some(value.into()))
    }

    /// Deletes the value at `path`.
    pub fn unset(&mut self, path: impl Into<Path>) -> Result<SetOutcome, DataError> {
        self.write(&path.into(), None)
    }

    /// Assigns (`Some`) or deletes (`None`) the value at `path`.
    ///
    /// Intermediate containers are auto-created as empty objects when missing;
    /// creating one counts as a change. Writing through a primitive, through a
    /// sequence with a non-index component, or into a set fails without
    /// mutating anything.
    pub fn write(&mut self, path: &Path, value: Option<Value>) -> Result<SetOutcome, DataError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(DataError::EmptyPath);
        };

        let captured_previous = self.previous.is_none();
        if captured_previous {
            self.previous = Some(self.current.clone());
        }

        match Self::write_at(&mut self.current, parents, last, value) {
            Ok(true) => Ok(SetOutcome {
                changed: true,
                captured_previous,
            }),
            Ok(false) => {
                if captured_previous {
                    self.previous = None;
                }
                Ok(SetOutcome {
                    changed: false,
                    captured_previous: false,
                })
            }
            Err(blocked) => {
                if captured_previous {
                    self.previous = None;
                }
                let error = Self::describe(path, blocked);
                trace!(%path, %error, "write rejected");
                Err(error)
            }
        }
    }

    fn write_at(
        root: &mut Value,
        parents: &[String],
        last: &str,
        value: Option<Value>,
    ) -> Result<bool, (String, Blocked)> {
        let mut changed = false;
        let mut current = root;
        for component in parents {
            // Deleting never needs to create the containers leading to it.
            let create = value.is_some();
            let step = navigate::child_mut(current, component, create)
                .map_err(|blocked| (component.clone(), blocked))?;
            match step {
                Some(step) => {
                    changed |= step.created;
                    current = step.value;
                }
                None => return Ok(false),
            }
        }
        let assigned = navigate::assign(current, last, value)
            .map_err(|blocked| (last.to_string(), blocked))?;
        Ok(changed || assigned)
    }

    fn describe(path: &Path, (component, blocked): (String, Blocked)) -> DataError {
        let path = path.to_string();
        match blocked {
            Blocked::SetLike => DataError::SetNotWritable { path, component },
            Blocked::NotIndex => DataError::NotNavigable {
                path,
                component,
                kind: "list",
            },
            Blocked::Primitive(kind) => DataError::NotNavigable {
                path,
                component,
                kind,
            },
        }
    }
}
