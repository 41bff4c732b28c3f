use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

const VALUE_FIELD: &str = "Value";

/// Decode the base64 `Value` of each entry returned by `GET /v1/kv/{key}`.
///
/// Without `recurse` only the first entry is returned (`Null` for an empty body).
/// With `buffer` the bytes are kept as `{"type": "Buffer", "data": [...]}` instead
/// of being read as UTF-8 text.
pub fn decode_kv_entries(body: Value, recurse: bool, buffer: bool) -> Result<Value, String> {
    let Value::Array(entries) = body else {
        return Err(format!("expected a JSON array, got {}", kind_of(&body)));
    };

    let mut decoded = entries
        .into_iter()
        .map(|entry| decode_entry(entry, buffer))
        .collect::<Result<Vec<_>, _>>()?;

    if recurse {
        return Ok(Value::Array(decoded));
    }
    if decoded.is_empty() {
        return Ok(Value::Null);
    }
    Ok(decoded.swap_remove(0))
}

fn decode_entry(mut entry: Value, buffer: bool) -> Result<Value, String> {
    let Some(object) = entry.as_object_mut() else {
        return Err(format!("expected a key/value entry, got {}", kind_of(&entry)));
    };
    let Some(Value::String(encoded)) = object.get(VALUE_FIELD) else {
        return Ok(entry);
    };
    let key = object
        .get("Key")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|err| format!("value of `{key}` is not valid base64: {err}"))?;
    let value = if buffer {
        json!({ "type": "Buffer", "data": bytes })
    } else {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    };
    object.insert(VALUE_FIELD.into(), value);
    Ok(entry)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
