//! `application/x-www-form-urlencoded` encoding.
//!
//! Follows the conventions of PHP's `http_build_query`, which is what the API
//! expects: nested values are flattened into `key[sub]` names, `null` values are
//! left out and booleans are sent as `1`/`0`.

use crate::error::{Error, Result};
use serde_json::Value;
use url::form_urlencoded::Serializer;

/// Encode string pairs, e.g. query parameters
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let mut serializer = Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Encode a structured body, only objects and arrays have field names to encode
pub fn encode_value(value: &Value) -> Result<String> {
    let mut pairs = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, field) in map {
                flatten(key.clone(), field, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(index.to_string(), item, &mut pairs);
            }
        }
        other => {
            return Err(Error::encoding(
                "form body must be an object or an array",
                other.to_string(),
            ))
        }
    }

    Ok(encode_pairs(&pairs))
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((key, if *flag { "1" } else { "0" }.to_string())),
        Value::Number(number) => pairs.push((key, number.to_string())),
        Value::String(text) => pairs.push((key, text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{}[{}]", key, index), item, pairs);
            }
        }
        Value::Object(map) => {
            for (field, item) in map {
                flatten(format!("{}[{}]", key, field), item, pairs);
            }
        }
    }
}
