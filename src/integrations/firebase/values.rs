// src/integrations/firebase/values.rs
//
// Plain JSON <-> Firestore typed value encoding.
//
// Timestamps come back as RFC 3339 strings. On the way out, top-level keys
// named in `timestamp_keys` are written as timestampValue when they parse.

use chrono::DateTime;
use serde_json::{json, Map, Value};

pub fn encode_fields(fields: &Map<String, Value>, timestamp_keys: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let encoded = match value {
                Value::String(text) if timestamp_keys.contains(&key.as_str()) => {
                    encode_timestamp(text)
                }
                _ => encode_value(value),
            };
            (key.clone(), encoded)
        })
        .collect()
}

fn encode_timestamp(text: &str) -> Value {
    match DateTime::parse_from_rfc3339(text) {
        Ok(_) => json!({ "timestampValue": text }),
        Err(e) => {
            log::warn!("Writing unparsable timestamp {:?} as a string: {}", text, e);
            json!({ "stringValue": text })
        }
    }
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map, &[]) } }),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

pub fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = typed.get("integerValue") {
        return match s {
            Value::String(text) => text
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(text.clone())),
            other => other.clone(),
        };
    }

    for key in ["stringValue", "timestampValue", "referenceValue", "bytesValue"] {
        if let Some(s) = typed.get(key) {
            return s.clone();
        }
    }

    if let Some(b) = typed.get("booleanValue") {
        return b.clone();
    }
    if let Some(d) = typed.get("doubleValue") {
        return d.clone();
    }
    if let Some(array) = typed.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(map) = typed.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_default();
        return Value::Object(fields);
    }
    if let Some(geo) = typed.get("geoPointValue") {
        return geo.clone();
    }

    Value::Null
}
