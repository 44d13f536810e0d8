//! Nested value access over plain form data.
//!
//! Form data is a single `serde_json::Value` object owned by the engine.
//! This module reads and writes it by [`LogicalPath`], one object key per
//! segment. The functions are deliberately index-agnostic: array elements
//! are addressed one level up (the engine injects indices when it needs a
//! concrete storage location), which keeps this layer free of array policy.
//!
//! Failure policy: reading through a missing intermediate yields `None`,
//! never an error. Writing through a missing intermediate creates a plain
//! object at that point, never an array. An intermediate that exists but
//! is not an object is replaced on write.

use serde_json::{Map, Value};

use crate::path::LogicalPath;

/// Reads the value at `path`, or `None` if any intermediate is missing.
///
/// # Example
///
/// ```rust
/// use formwork::{value, LogicalPath};
/// use serde_json::json;
///
/// let data = json!({"user": {"name": "Ada"}});
/// assert_eq!(value::get(&data, &LogicalPath::new("user.name")), Some(&json!("Ada")));
/// assert_eq!(value::get(&data, &LogicalPath::new("user.missing")), None);
/// ```
pub fn get<'a>(data: &'a Value, path: &LogicalPath) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.segments() {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// # Example
///
/// ```rust
/// use formwork::{value, LogicalPath};
/// use serde_json::json;
///
/// let mut data = json!({});
/// value::set(&mut data, &LogicalPath::new("user.name"), json!("Ada"));
/// assert_eq!(data, json!({"user": {"name": "Ada"}}));
/// ```
pub fn set(data: &mut Value, path: &LogicalPath, value: Value) {
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }

    let segments: Vec<&str> = path.segments().collect();
    let Some((last, intermediate)) = segments.split_last() else {
        return;
    };

    let mut current = data;
    for segment in intermediate {
        let map = current.as_object_mut().expect("intermediate is an object");
        let entry = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }

    current
        .as_object_mut()
        .expect("target is an object")
        .insert(last.to_string(), value);
}

/// Removes the value at `path`. Absent paths are a no-op.
pub fn delete(data: &mut Value, path: &LogicalPath) {
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, intermediate)) = segments.split_last() else {
        return;
    };

    let mut current = data;
    for segment in intermediate {
        match current.as_object_mut().and_then(|m| m.get_mut(*segment)) {
            Some(next) => current = next,
            None => return,
        }
    }

    if let Some(map) = current.as_object_mut() {
        map.remove(*last);
    }
}

/// Returns true if `path` resolves to a stored value.
///
/// Unlike [`get`], this distinguishes a stored `null` from an absent key:
/// `has` reports true for stored nulls.
pub fn has(data: &Value, path: &LogicalPath) -> bool {
    let mut current = data;
    for segment in path.segments() {
        match current.as_object().and_then(|m| m.get(segment)) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}
