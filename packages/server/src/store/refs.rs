use serde_json::Value;

/// Read a user's `plate_refs` column as a list of IDs.
///
/// Non-string entries are skipped; a non-array value reads as empty.
pub fn plate_refs(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Array-union: append `id` unless already present.
pub fn with_ref(value: &Value, id: &str) -> Value {
    let mut refs = plate_refs(value);
    if !refs.iter().any(|r| r == id) {
        refs.push(id.to_string());
    }
    Value::from(refs)
}

/// Array-remove: drop every occurrence of `id`.
pub fn without_ref(value: &Value, id: &str) -> Value {
    let refs: Vec<String> = plate_refs(value).into_iter().filter(|r| r != id).collect();
    Value::from(refs)
}
