//! Path-based extraction from a serialized response tree
//!
//! Provider integrations disagree on the static shape of a chat response, so
//! usage accounting reads the serialized `serde_json::Value` tree by path
//! instead of binding to a concrete struct. A missing path is representable
//! (`None`), never a panic or an error.

use serde_json::Value;

/// Look up a value by dot-separated path, e.g. `"usage.prompt_tokens"`.
///
/// Segments index into objects by key; a segment that parses as a number
/// indexes into arrays, e.g. `"choices.0.message.content"`. Returns `None`
/// as soon as any segment is absent or the shape doesn't match.
pub fn json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Look up an unsigned integer leaf by path
pub fn json_path_u64(value: &Value, path: &str) -> Option<u64> {
    json_path(value, path)?.as_u64()
}
