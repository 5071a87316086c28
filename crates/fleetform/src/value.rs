// File: src/value.rs
// Purpose: Data bag helpers (dotted-path lookup, truthiness, display text)

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Resolve a dotted path (`address.zip`) inside a data bag
///
/// Missing segments, `null` and non-object intermediates all resolve to
/// `None`; lookup never fails.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Browser-style truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy
///
/// Arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a value as string rules see it
///
/// Integral floats print without a trailing `.0`, arrays join their items
/// with commas and `null` is the empty string.
pub fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(format_number(n)),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| as_text(item).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Expand flat dotted keys into nested objects
///
/// `{"address.zip": "33139", "name": "Ana"}` becomes
/// `{"address": {"zip": "33139"}, "name": "Ana"}`. When a key collides with
/// an existing non-object value, the later key wins.
pub fn expand_dotted(flat: &Map<String, Value>) -> Value {
    let mut root = Value::Object(Map::new());
    for (key, value) in flat {
        insert_path(&mut root, key, value.clone());
    }
    root
}

/// Store `value` at a dotted path, creating (or replacing non-object)
/// intermediates so that `lookup(root, path)` returns it afterwards
pub fn insert_path(root: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut cursor = root;

    while let Some(segment) = segments.next() {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        let Value::Object(map) = cursor else {
            unreachable!("cursor was just made an object")
        };

        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        cursor = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}
