//! Value types for the data store.
//!
//! [`Value`] is the JSON-like graph a renderer's template is fed with. It covers
//! the primitives (null, booleans, numbers, big integers, text, computed
//! functions) plus dates, regular expressions and four container kinds:
//! ordered sequences, objects, string-keyed maps and sets.
//!
//! Values are owned trees. Cloning a value copies every container element by
//! element, so a clone never shares mutable structure with its source; computed
//! functions are the one exception and are shared by reference. Because a value
//! owns its children, cyclic graphs cannot be built.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::navigate;
use super::path::Path;

/// Ordered string-keyed container used for both objects and maps.
pub type Object = IndexMap<String, Value>;

/// A lazily computed field.
///
/// Reading a computed value through the store invokes the function and yields
/// its result. Clones share the same function; two `Computed` are equal only if
/// they are the same function instance.
#[derive(Clone)]
pub struct Computed(Arc<dyn Fn() -> Value + Send + Sync>);

impl Computed {
    /// Wraps a function as a computed value.
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the function.
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Computed(<fn>)")
    }
}

impl PartialEq for Computed {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Canonical order of regular expression flags.
const REGEXP_FLAG_ORDER: &str = "dgimsuvy";

/// A regular expression literal, kept as source and flags.
///
/// The store never executes expressions; it only has to carry them through
/// clones and hand them back to templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegExp {
    source: String,
    flags: String,
}

impl RegExp {
    /// Creates an expression, normalizing flags to their canonical order and
    /// dropping unknown or repeated flags.
    pub fn new(source: impl Into<String>, flags: &str) -> Self {
        let flags = REGEXP_FLAG_ORDER
            .chars()
            .filter(|flag| flags.contains(*flag))
            .collect();
        Self {
            source: source.into(),
            flags,
        }
    }

    /// The pattern source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The normalized flags.
    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Values that can be stored in a data store.
///
/// # Value Types
///
/// ## Primitives
/// - [`Value::Null`], [`Value::Bool`], [`Value::Number`], [`Value::BigInt`],
///   [`Value::Text`]
/// - [`Value::Function`] - computed on read
/// - [`Value::Date`], [`Value::RegExp`]
///
/// ## Containers
/// - [`Value::List`] - ordered sequence, addressed by index
/// - [`Value::Object`] - plain object, addressed by property name
/// - [`Value::Map`] - keyed map, addressed by key
/// - [`Value::Set`] - unique elements, readable by position only
///
/// Absence (an unset property) is modelled by `Option::None` at the API
/// boundary rather than by a variant.
///
/// ```
/// # use myopie::data::Value;
/// let text = Value::from("hello");
/// assert!(text == "hello");
/// assert_eq!(Value::from(42).to_string(), "42");
/// assert_eq!(Value::List(vec![1.into(), 2.into()]).to_string(), "1,2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Double precision number
    Number(f64),
    /// Arbitrary precision integers are capped at 128 bits
    BigInt(i128),
    /// UTF-8 text
    Text(String),
    /// Lazily computed value
    Function(Computed),
    /// Point in time
    Date(DateTime<Utc>),
    /// Regular expression literal
    RegExp(RegExp),
    /// Ordered sequence
    List(Vec<Value>),
    /// Plain object
    Object(Object),
    /// Keyed map
    Map(Object),
    /// Collection of unique elements, in insertion order
    Set(Vec<Value>),
}

impl Value {
    /// Creates an empty object.
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    /// Creates a set from the given elements, dropping duplicates.
    pub fn set_of<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut elements: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !elements.contains(&item) {
                elements.push(item);
            }
        }
        Value::Set(elements)
    }

    /// Creates a keyed map from `(key, value)` pairs. Later keys win.
    pub fn map_of<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a computed value.
    pub fn function(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Value::Function(Computed::new(f))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Text(_) => "text",
            Value::Function(_) => "function",
            Value::Date(_) => "date",
            Value::RegExp(_) => "regexp",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }

    /// Returns true if this value can hold children
    pub fn is_container(&self) -> bool {
        navigate::ContainerKind::of(self).is_some()
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert to a date
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Attempts to convert to a regular expression
    pub fn as_regexp(&self) -> Option<&RegExp> {
        match self {
            Value::RegExp(r) => Some(r),
            _ => None,
        }
    }

    /// Attempts to convert to a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to convert to an object or map
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) | Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to convert to the elements of a set
    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Returns true if a set contains the element
    pub fn set_contains(&self, element: &Value) -> bool {
        self.as_set().is_some_and(|set| set.contains(element))
    }

    /// Resolves computed values: functions are invoked, everything else is
    /// returned as is.
    pub fn resolve(&self) -> Value {
        match self {
            Value::Function(f) => f.call(),
            other => other.clone(),
        }
    }

    /// Navigates a path read-only, without invoking computed values.
    ///
    /// The empty path returns `self`. This is the same traversal the data store
    /// uses for `get`, exposed so templates can address their input the same way.
    ///
    /// ```
    /// # use myopie::data::Value;
    /// let data = Value::from(serde_json::json!({"user": {"tags": ["a", "b"]}}));
    /// assert_eq!(data.get_path("user/tags/1"), Some(&Value::from("b")));
    /// assert_eq!(data.get_path("user/missing"), None);
    /// ```
    pub fn get_path(&self, path: impl AsRef<str>) -> Option<&Value> {
        let path = Path::parse(path.as_ref());
        let mut current = self;
        for component in path.components() {
            current = navigate::child(current, component)?;
        }
        Some(current)
    }

    /// Parses JSON text into a value.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Ok(parsed.into())
    }

    /// Text value of a path for templates: the resolved value's string form, or
    /// the empty string when the path is missing.
    pub fn text_at(&self, path: impl AsRef<str>) -> String {
        self.get_path(path)
            .map(|v| v.resolve().to_string())
            .unwrap_or_default()
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Negative zero prints as zero.
        f.write_str("0")
    } else {
        write!(f, "{n}")
    }
}

/// String conversion in the manner of a template engine: text is written raw,
/// numbers without a trailing `.0`, lists joined by commas.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::BigInt(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Function(func) => write!(f, "{}", func.call()),
            Value::Date(d) => f.write_str(&d.to_rfc3339()),
            Value::RegExp(r) => write!(f, "{r}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // Null elements render as empty strings inside a list.
                    if !item.is_null() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Map(_) => f.write_str("[object Map]"),
            Value::Set(_) => f.write_str("[object Set]"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::BigInt(n) => serializer.serialize_i128(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Function(func) => func.call().serialize(serializer),
            Value::Date(d) => serializer.serialize_str(&d.to_rfc3339()),
            Value::RegExp(r) => serializer.collect_str(r),
            Value::List(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) | Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::object()
    }
}

// ===== CONVERSIONS =====

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<RegExp> for Value {
    fn from(value: RegExp) -> Self {
        Value::RegExp(value)
    }
}

impl From<Computed> for Value {
    fn from(value: Computed) -> Self {
        Value::Function(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ===== PRIMITIVE COMPARISONS =====

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_number() == Some(*other)
    }
}
