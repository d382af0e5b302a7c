//! Path writes and the previous snapshot

use myopie::data::{DataStore, Value};

// ===== ASSIGNMENT =====

#[test]
fn test_set_then_get() {
    let mut store = DataStore::new(Value::object());
    assert!(store.set("key", "value").unwrap().changed);
    assert_eq!(store.get("key"), Some(Value::from("value")));

    assert!(store.set("key", "new").unwrap().changed);
    assert_eq!(store.get("key"), Some(Value::from("new")));
}

#[test]
fn test_set_same_value_is_not_a_change() {
    let mut store = DataStore::new(serde_json::json!({"key": "original"}));
    let outcome = store.set("key", "original").unwrap();
    assert!(!outcome.changed);
    assert!(store.previous().is_none());
}

#[test]
fn test_set_creates_intermediate_objects() {
    let mut store = DataStore::new(Value::object());
    assert!(store.set("a/b/c", "deep").unwrap().changed);
    assert_eq!(store.get("a/b/c"), Some(Value::from("deep")));
    assert!(store.get("a/b").unwrap().as_object().is_some());
}

#[test]
fn test_set_array_index() {
    let mut store = DataStore::new(serde_json::json!({"arr": ["a", "b", "c"]}));
    assert!(store.set("arr/1", "modified").unwrap().changed);
    assert_eq!(store.get("arr/1"), Some(Value::from("modified")));
}

#[test]
fn test_set_through_missing_array_slot() {
    let mut store = DataStore::new(serde_json::json!({"items": []}));
    assert!(store.set("items/0/name", "test").unwrap().changed);
    assert_eq!(store.get("items/0/name"), Some(Value::from("test")));
}

#[test]
fn test_set_past_array_end_pads_with_null() {
    let mut store = DataStore::new(serde_json::json!({"items": ["a"]}));
    store.set("items/3", "d").unwrap();
    assert_eq!(store.get("items/1"), Some(Value::Null));
    assert_eq!(store.get("items/2"), Some(Value::Null));
    assert_eq!(store.get("items/3"), Some(Value::from("d")));
}

#[test]
fn test_set_map_entries() {
    let mut store = DataStore::new(Value::map_of([(
        "key",
        Value::from(serde_json::json!({"nested": "old"})),
    )]));
    assert!(store.set("key/nested", "new").unwrap().changed);
    assert_eq!(store.get("key/nested"), Some(Value::from("new")));

    assert!(store.set("newkey/value", "test").unwrap().changed);
    assert_eq!(store.get("newkey/value"), Some(Value::from("test")));
}

// ===== DELETION =====

#[test]
fn test_unset_removes_key() {
    let mut store = DataStore::new(serde_json::json!({"key": "value"}));
    assert!(store.unset("key").unwrap().changed);
    assert_eq!(store.get("key"), None);
    assert!(!store.unset("key").unwrap().changed);
}

#[test]
fn test_unset_array_slot_leaves_hole() {
    let mut store = DataStore::new(serde_json::json!({"arr": ["a", "b", "c"]}));
    assert!(store.unset("arr/1").unwrap().changed);
    assert_eq!(store.get("arr/1"), Some(Value::Null));
    assert_eq!(store.get("arr/2"), Some(Value::from("c")));
}

// ===== FAILURES =====

#[test]
fn test_set_through_primitive_fails_without_mutation() {
    let mut store = DataStore::new(serde_json::json!({"value": 42}));
    let err = store.set("value/deeper/key", "test").unwrap_err();
    assert!(err.is_not_navigable());
    assert_eq!(err.path(), Some("value/deeper/key"));
    assert_eq!(err.component(), Some("deeper"));
    assert_eq!(store.get("value"), Some(Value::from(42)));
    assert!(store.previous().is_none());
}

#[test]
fn test_set_into_set_fails() {
    let mut store = DataStore::new(Value::map_of([("tags", Value::set_of(["a"]))]));
    let err = store.set("tags/0", "b").unwrap_err();
    assert!(err.is_set_write());
    assert_eq!(store.get("tags/0"), Some(Value::from("a")));
}

#[test]
fn test_set_errors_convert_into_crate_error() {
    let mut store = DataStore::new(serde_json::json!({"value": 1}));
    let err: myopie::Error = store.set("value/x", 2).unwrap_err().into();
    assert!(err.is_data_error());
    assert!(err.is_not_navigable());
}

// ===== PREVIOUS SNAPSHOT =====

#[test]
fn test_previous_holds_pre_batch_state() {
    let mut store = DataStore::new(serde_json::json!({"count": 1}));
    store.set("count", 2).unwrap();
    store.set("count", 3).unwrap();
    assert_eq!(store.get("count"), Some(Value::from(3)));
    assert_eq!(
        store.previous().and_then(|p| p.get_path("count")),
        Some(&Value::from(1))
    );

    store.clear_previous();
    store.set("count", 4).unwrap();
    assert_eq!(
        store.previous().and_then(|p| p.get_path("count")),
        Some(&Value::from(3))
    );
}
