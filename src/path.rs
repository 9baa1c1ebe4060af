//! Dotted-path helpers.
//!
//! Column keys may denote nested placement (`addr.city`). Aggregation writes
//! through [`set_path`]; conditions read through [`get_path`].

use serde_json::{Map, Value};

use crate::types::RowData;

/// Write `value` at a dotted `path` inside `target`.
///
/// Missing intermediate objects are created. An intermediate that exists but is
/// not an object is replaced by one.
///
/// ```ignore
/// let mut row = RowData::new();
/// set_path(&mut row, "addr.city", json!("Oslo"));
/// // row == {"addr": {"city": "Oslo"}}
/// ```
pub fn set_path(target: &mut RowData, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = target;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }

        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else { return };
        current = map;
    }
}

/// Read a dotted `path` from `source`.
pub fn get_path<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(source, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Read a dotted `path` from a row object.
pub fn get_row_path<'a>(row: &'a RowData, path: &str) -> Option<&'a Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let first = row.get(head)?;
    match rest {
        Some(rest) => get_path(first, rest),
        None => Some(first),
    }
}
