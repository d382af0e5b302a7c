use chrono::{TimeZone, Utc};
use myopie::data::{DataStore, RegExp, Value};

/// A store holding one value of every supported kind.
pub fn sample_store() -> DataStore {
    let mut data = match Value::from(serde_json::json!({
        "stringValue": "hello",
        "numberZero": 0,
        "numberPositive": 42,
        "numberNegative": -10,
        "booleanTrue": true,
        "booleanFalse": false,
        "nullValue": null,
        "arrayValues": ["first", "second", "third"],
        "nested": {"deep": {"value": "found"}},
    })) {
        Value::Object(map) => map,
        _ => unreachable!("sample data is an object"),
    };
    data.insert(
        "mapValue".into(),
        Value::map_of([("key1", "map value 1"), ("key2", "map value 2")]),
    );
    data.insert("setValue".into(), Value::set_of(["item1", "item2"]));
    data.insert(
        "functionValue".into(),
        Value::function(|| Value::from("function result")),
    );
    data.insert(
        "dateValue".into(),
        Value::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    );
    data.insert("regexValue".into(), Value::from(RegExp::new("test", "ig")));
    DataStore::new(Value::Object(data))
}
