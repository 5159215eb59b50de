//! `serde_json::Value` interop.
//!
//! JSON objects become [`Value::Map`] with text keys, arrays become lists.
//! Integers outside the `i64` range become [`Value::Float`] and may lose
//! precision.
//!
//! Going the other way, objects serialize as JSON objects keyed by field name
//! and non-text map keys are rendered with their `Display` form. Keys that
//! render the same (`Int(1)` and `Text("1")`) collapse into one JSON member;
//! the later entry wins.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::{IntoValue, Value};

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Bool(flag),
            JsonValue::Number(number) => number
                .as_i64()
                .map(Value::Int)
                .or_else(|| number.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            JsonValue::String(text) => Value::text(text),
            JsonValue::Array(items) => Value::list(items.into_iter().map(Value::from)),
            JsonValue::Object(fields) => Value::map(
                fields
                    .into_iter()
                    .map(|(key, value)| (Value::text(key), Value::from(value))),
            ),
        }
    }
}

impl IntoValue for JsonValue {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

fn json_key(key: &Value) -> String {
    match key {
        Value::Text(text) => text.to_string(),
        other => other.to_string(),
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(flag) => JsonValue::Bool(*flag),
            Value::Int(int) => JsonValue::Number((*int).into()),
            Value::Float(float) => Number::from_f64(*float).map_or(JsonValue::Null, JsonValue::Number),
            Value::Text(text) => JsonValue::String(text.to_string()),
            Value::Array(items) | Value::List(items) | Value::Set(items) => {
                JsonValue::Array(items.iter().map(JsonValue::from).collect())
            }
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (json_key(key), JsonValue::from(value)))
                    .collect::<JsonMap<_, _>>(),
            ),
            Value::Object(object) => JsonValue::Object(
                object
                    .field_names()
                    .iter()
                    .zip(object.field_values())
                    .map(|(name, value)| ((*name).to_string(), JsonValue::from(&value)))
                    .collect::<JsonMap<_, _>>(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        JsonValue::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_object_becomes_text_keyed_map() {
        let value = Value::from(json!({ "email": "123456@qq.com", "age": 3 }));
        assert_eq!(
            value.get(&Value::text("email")),
            Some(&Value::text("123456@qq.com"))
        );
        assert_eq!(value.get(&Value::text("age")), Some(&Value::Int(3)));
    }

    #[test]
    fn list_back_to_json() {
        let value = Value::list([Value::text("a"), Value::Float(1.5), Value::Null]);
        assert_eq!(JsonValue::from(value), json!(["a", 1.5, null]));
    }

    #[test]
    fn non_text_keys_are_rendered() {
        let value = Value::map([(Value::Int(1), Value::Bool(true))]);
        assert_eq!(JsonValue::from(value), json!({ "1": true }));
    }

    #[test]
    fn keys_rendering_alike_keep_the_later_entry() {
        let value = Value::map([
            (Value::Int(1), Value::text("int")),
            (Value::text("1"), Value::text("text")),
        ]);
        assert_eq!(JsonValue::from(value), json!({ "1": "text" }));
    }

    #[test]
    fn integers_beyond_i64_become_floats() {
        let value = Value::from(json!(u64::MAX));
        assert_eq!(value, Value::Float(u64::MAX as f64));
        assert_eq!(Value::from(json!(i64::MAX)), Value::Int(i64::MAX));
    }
}
