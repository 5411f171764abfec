//! Result projector
//!
//! Flattens result records into columns and cells for tabular display.
//! Nested objects become dot paths (`player.name`); arrays stay leaf values
//! and are shown as JSON. The internal `_id` column is never shown.
//!
//! [`columns`] looks at the first record only, so fields that appear only in
//! later records are not shown. [`all_columns`] is the union over every
//! record, in first-seen order, for callers that want everything.

use serde_json::{Map, Value as JsonValue};

/// Internal identifier field excluded from projection
pub const ID_FIELD: &str = "_id";

/// Cell text for null or missing values
pub const PLACEHOLDER: &str = "-";

/// Columns derived from the first record
pub fn columns(results: &[JsonValue]) -> Vec<String> {
    results.first().map(record_columns).unwrap_or_default()
}

/// Columns from every record, in first-seen order
pub fn all_columns(results: &[JsonValue]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for record in results {
        for column in record_columns(record) {
            if !out.contains(&column) {
                out.push(column);
            }
        }
    }
    out
}

fn record_columns(record: &JsonValue) -> Vec<String> {
    let mut out = Vec::new();
    if let JsonValue::Object(map) = record {
        flatten_keys(map, "", &mut out);
    }
    out.retain(|key| key != ID_FIELD);
    out
}

fn flatten_keys(map: &Map<String, JsonValue>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            JsonValue::Object(inner) => flatten_keys(inner, &full, out),
            _ => out.push(full),
        }
    }
}

/// Resolves a dot path through `record`, tolerating missing levels
///
/// Numeric segments index into arrays.
pub fn resolve<'a>(record: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(record, |value, segment| match value {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Text for one cell
///
/// Null and missing values become [`PLACEHOLDER`]; arrays and objects are
/// written as compact JSON; strings, numbers and booleans pass through.
pub fn format_value(record: &JsonValue, path: &str) -> String {
    match resolve(record, path) {
        None | Some(JsonValue::Null) => PLACEHOLDER.to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(value @ (JsonValue::Array(_) | JsonValue::Object(_))) => value.to_string(),
        Some(scalar) => scalar.to_string(),
    }
}

/// Cells of one record for the given columns
pub fn row(record: &JsonValue, columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| format_value(record, c)).collect()
}
