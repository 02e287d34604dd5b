//! Override-biased deep merge of variable bags
//!
//! At any merge point exactly two bags exist: an override bag (per-component
//! configuration, higher precedence) and a global bag (cluster-wide
//! fallback). The merge never drops a key present in either input. An
//! explicit `null` in the override means "fall back to global at this key";
//! for object/object pairs the merge recurses field by field; everything
//! else (scalars, arrays, type mismatches) resolves in the override's
//! favor.

use serde_json::Value;

use super::VariableBag;

/// Merge a per-component override bag over a global fallback bag
///
/// Precedence is override > global for scalars and field-wise for nested
/// objects: a field present and non-null in the override wins, a field
/// absent or null in the override is filled from global, recursively.
/// Arrays are leaves — an override array (even an empty one) wins
/// wholesale.
pub fn merge(overrides: &VariableBag, global: &VariableBag) -> VariableBag {
    let mut merged = overrides.clone();
    for (name, global_value) in global.iter() {
        // A null global value has nothing to contribute
        if global_value.is_null() {
            continue;
        }
        let combined = match merged.get_raw(name) {
            None | Some(Value::Null) => global_value.clone(),
            Some(existing) => deep_merge(existing, global_value),
        };
        merged.insert_raw(name.clone(), combined);
    }
    merged
}

/// Merge two JSON values with the override-biased fill rule
fn deep_merge(overriding: &Value, fallback: &Value) -> Value {
    match (overriding, fallback) {
        (Value::Object(over), Value::Object(fall)) => {
            let mut out = over.clone();
            for (key, fall_value) in fall {
                if fall_value.is_null() {
                    continue;
                }
                let combined = match over.get(key) {
                    None | Some(Value::Null) => fall_value.clone(),
                    Some(over_value) => deep_merge(over_value, fall_value),
                };
                out.insert(key.clone(), combined);
            }
            Value::Object(out)
        }
        // Scalars, arrays, and mismatched shapes: the override wins unchanged
        _ => overriding.clone(),
    }
}
