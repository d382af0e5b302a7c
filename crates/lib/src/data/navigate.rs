//! Per-container navigation.
//!
//! Every container kind gets a [`Navigator`]: a small table of functions that
//! read a child, reach (and optionally create) a child for writing, and assign
//! or delete a child. The store dispatches on [`ContainerKind`] through
//! [`ContainerKind::navigator`] instead of inspecting values ad hoc, so adding a
//! container kind means adding one table.

use super::value::{Object, Value};

/// The container kinds a path can step through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered sequence addressed by integer index.
    Sequence,
    /// Plain object addressed by property name.
    Mapping,
    /// Keyed map addressed by raw key.
    Keyed,
    /// Set, readable by position, never writable.
    SetLike,
}

impl ContainerKind {
    /// Classifies a value; primitives are not containers.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::List(_) => Some(ContainerKind::Sequence),
            Value::Object(_) => Some(ContainerKind::Mapping),
            Value::Map(_) => Some(ContainerKind::Keyed),
            Value::Set(_) => Some(ContainerKind::SetLike),
            _ => None,
        }
    }

    /// The navigation table for this kind.
    pub(crate) fn navigator(self) -> &'static Navigator {
        match self {
            ContainerKind::Sequence => &SEQUENCE,
            ContainerKind::Mapping | ContainerKind::Keyed => &KEYED,
            ContainerKind::SetLike => &SET_LIKE,
        }
    }
}

/// Why a write step could not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Blocked {
    /// The value at this step is a primitive.
    Primitive(&'static str),
    /// A sequence was addressed with a component that is not an index.
    NotIndex,
    /// Sets are read-only.
    SetLike,
}

/// A child reached while walking a path for writing.
pub(crate) struct Step<'a> {
    /// Whether the child was auto-created by this step.
    pub created: bool,
    pub value: &'a mut Value,
}

type ReadFn = for<'a> fn(&'a Value, &str) -> Option<&'a Value>;
type WriteFn = for<'a> fn(&'a mut Value, &str, bool) -> Result<Option<Step<'a>>, Blocked>;
type AssignFn = fn(&mut Value, &str, Option<Value>) -> Result<bool, Blocked>;

/// Navigation capabilities of one container kind.
pub(crate) struct Navigator {
    /// Reads the child at a component.
    pub read: ReadFn,
    /// Reaches the child at a component for writing, creating an empty object
    /// when missing and asked to.
    pub write: WriteFn,
    /// Assigns (`Some`) or deletes (`None`) the child at a component and reports
    /// whether anything changed.
    pub assign: AssignFn,
}

static SEQUENCE: Navigator = Navigator {
    read: sequence_read,
    write: sequence_write,
    assign: sequence_assign,
};

static KEYED: Navigator = Navigator {
    read: keyed_read,
    write: keyed_write,
    assign: keyed_assign,
};

static SET_LIKE: Navigator = Navigator {
    read: set_read,
    write: set_write,
    assign: set_assign,
};

/// Reads the child of `value` at `component`. Primitives have no children.
pub(crate) fn child<'a>(value: &'a Value, component: &str) -> Option<&'a Value> {
    let kind = ContainerKind::of(value)?;
    (kind.navigator().read)(value, component)
}

/// Reaches the child of `value` at `component` for writing.
pub(crate) fn child_mut<'a>(
    value: &'a mut Value,
    component: &str,
    create: bool,
) -> Result<Option<Step<'a>>, Blocked> {
    match ContainerKind::of(value) {
        Some(kind) => (kind.navigator().write)(value, component, create),
        None => Err(Blocked::Primitive(value.type_name())),
    }
}

/// Assigns or deletes the child of `value` at `component`.
pub(crate) fn assign(
    value: &mut Value,
    component: &str,
    new_value: Option<Value>,
) -> Result<bool, Blocked> {
    match ContainerKind::of(value) {
        Some(kind) => (kind.navigator().assign)(value, component, new_value),
        None => Err(Blocked::Primitive(value.type_name())),
    }
}

/// A canonical array index: ASCII digits without sign or leading zeros, like
/// the keys JS treats as array indices.
fn parse_index(component: &str) -> Option<usize> {
    let canonical = match component.as_bytes() {
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    if canonical { component.parse().ok() } else { None }
}

// ===== SEQUENCE =====

fn sequence_read<'a>(value: &'a Value, component: &str) -> Option<&'a Value> {
    match value {
        Value::List(items) => items.get(parse_index(component)?),
        _ => None,
    }
}

/// Grows `items` with nulls so that `index` is the next free slot.
fn pad_to(items: &mut Vec<Value>, index: usize) {
    if items.len() < index {
        items.resize(index, Value::Null);
    }
}

fn sequence_write<'a>(
    value: &'a mut Value,
    component: &str,
    create: bool,
) -> Result<Option<Step<'a>>, Blocked> {
    let items = match value {
        Value::List(items) => items,
        other => return Err(Blocked::Primitive(other.type_name())),
    };
    let index = parse_index(component).ok_or(Blocked::NotIndex)?;
    if index < items.len() {
        return Ok(Some(Step {
            created: false,
            value: &mut items[index],
        }));
    }
    if !create {
        return Ok(None);
    }
    pad_to(items, index);
    items.push(Value::object());
    Ok(Some(Step {
        created: true,
        value: &mut items[index],
    }))
}

fn sequence_assign(
    value: &mut Value,
    component: &str,
    new_value: Option<Value>,
) -> Result<bool, Blocked> {
    let items = match value {
        Value::List(items) => items,
        other => return Err(Blocked::Primitive(other.type_name())),
    };
    let index = parse_index(component).ok_or(Blocked::NotIndex)?;
    match new_value {
        Some(new_value) => match items.get_mut(index) {
            Some(slot) if *slot == new_value => Ok(false),
            Some(slot) => {
                *slot = new_value;
                Ok(true)
            }
            None => {
                pad_to(items, index);
                items.push(new_value);
                Ok(true)
            }
        },
        // Deleting a slot leaves a hole rather than shifting later elements.
        None => match items.get_mut(index) {
            Some(slot) if !slot.is_null() => {
                *slot = Value::Null;
                Ok(true)
            }
            _ => Ok(false),
        },
    }
}

// ===== OBJECT / MAP =====

fn entries(value: &Value) -> Option<&Object> {
    match value {
        Value::Object(map) | Value::Map(map) => Some(map),
        _ => None,
    }
}

fn entries_mut(value: &mut Value) -> Result<&mut Object, Blocked> {
    match value {
        Value::Object(map) | Value::Map(map) => Ok(map),
        other => Err(Blocked::Primitive(other.type_name())),
    }
}

fn keyed_read<'a>(value: &'a Value, component: &str) -> Option<&'a Value> {
    entries(value)?.get(component)
}

fn keyed_write<'a>(
    value: &'a mut Value,
    component: &str,
    create: bool,
) -> Result<Option<Step<'a>>, Blocked> {
    let map = entries_mut(value)?;
    let created = !map.contains_key(component);
    if created && !create {
        return Ok(None);
    }
    let child = map
        .entry(component.to_string())
        .or_insert_with(Value::object);
    Ok(Some(Step {
        created,
        value: child,
    }))
}

fn keyed_assign(
    value: &mut Value,
    component: &str,
    new_value: Option<Value>,
) -> Result<bool, Blocked> {
    let map = entries_mut(value)?;
    match new_value {
        Some(new_value) => {
            if map.get(component) == Some(&new_value) {
                return Ok(false);
            }
            map.insert(component.to_string(), new_value);
            Ok(true)
        }
        None => Ok(map.shift_remove(component).is_some()),
    }
}

// ===== SET =====

fn set_read<'a>(value: &'a Value, component: &str) -> Option<&'a Value> {
    match value {
        Value::Set(elements) => elements.get(parse_index(component)?),
        _ => None,
    }
}

fn set_write<'a>(
    _value: &'a mut Value,
    _component: &str,
    _create: bool,
) -> Result<Option<Step<'a>>, Blocked> {
    Err(Blocked::SetLike)
}

fn set_assign(
    _value: &mut Value,
    _component: &str,
    _new_value: Option<Value>,
) -> Result<bool, Blocked> {
    Err(Blocked::SetLike)
}
