//! Structural diff of two JSON trees into an RFC 6902 edit script
//!
//! Computes the minimal add/remove/replace operations transforming one
//! parsed JSON tree into another. Objects are diffed key by key,
//! recursively. Arrays are replaced wholesale on any element change: typed
//! views routinely reorder or rebuild list fields, and element-level array
//! patches against a live document that other mutators are also editing
//! are not safe to apply by index.

use json_patch::jsonptr::PointerBuf;
use json_patch::{AddOperation, PatchOperation, RemoveOperation, ReplaceOperation};
use serde_json::Value;

/// Compute the edit script transforming `before` into `after`
///
/// Returns an empty script when the trees are equal.
pub fn diff(before: &Value, after: &Value) -> Vec<PatchOperation> {
    let mut ops = Vec::new();
    diff_value(before, after, &mut Vec::new(), &mut ops);
    ops
}

fn diff_value(before: &Value, after: &Value, path: &mut Vec<String>, ops: &mut Vec<PatchOperation>) {
    match (before, after) {
        (Value::Object(before_map), Value::Object(after_map)) => {
            for (key, before_value) in before_map {
                match after_map.get(key) {
                    Some(after_value) => {
                        path.push(key.clone());
                        diff_value(before_value, after_value, path, ops);
                        path.pop();
                    }
                    None => ops.push(PatchOperation::Remove(RemoveOperation {
                        path: pointer(path, Some(key.as_str())),
                    })),
                }
            }
            for (key, after_value) in after_map {
                if !before_map.contains_key(key) {
                    ops.push(PatchOperation::Add(AddOperation {
                        path: pointer(path, Some(key.as_str())),
                        value: after_value.clone(),
                    }));
                }
            }
        }
        // Scalars, arrays, and shape changes: replace the subtree wholesale
        _ => {
            if before != after {
                ops.push(PatchOperation::Replace(ReplaceOperation {
                    path: pointer(path, None),
                    value: after.clone(),
                }));
            }
        }
    }
}

fn pointer(path: &[String], last: Option<&str>) -> PointerBuf {
    let mut buf = PointerBuf::from_tokens(path.iter().map(String::as_str));
    if let Some(token) = last {
        buf.push_back(token);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn replace_at(tokens: &[&str], value: Value) -> PatchOperation {
        PatchOperation::Replace(ReplaceOperation {
            path: PointerBuf::from_tokens(tokens.iter().copied()),
            value,
        })
    }

    fn add_at(tokens: &[&str], value: Value) -> PatchOperation {
        PatchOperation::Add(AddOperation {
            path: PointerBuf::from_tokens(tokens.iter().copied()),
            value,
        })
    }

    fn remove_at(tokens: &[&str]) -> PatchOperation {
        PatchOperation::Remove(RemoveOperation {
            path: PointerBuf::from_tokens(tokens.iter().copied()),
        })
    }

    #[test]
    fn test_equal_trees_produce_no_ops() {
        let v = json!({"a": 1, "b": {"c": [1, 2, 3]}});
        assert!(diff(&v, &v.clone()).is_empty());
        assert!(diff(&json!(null), &json!(null)).is_empty());
        assert!(diff(&json!([1, 2]), &json!([1, 2])).is_empty());
    }

    #[test]
    fn test_scalar_change_is_a_single_replace() {
        let ops = diff(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 3}));
        assert_eq!(ops, vec![replace_at(&["b"], json!(3))]);
    }

    #[test]
    fn test_added_key_is_a_single_add() {
        let ops = diff(&json!({"a": 1}), &json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(ops, vec![add_at(&["b"], json!({"c": 2}))]);
    }

    #[test]
    fn test_removed_key_is_a_single_remove() {
        let ops = diff(&json!({"a": 1, "b": 2}), &json!({"a": 1}));
        assert_eq!(ops, vec![remove_at(&["b"])]);
    }

    #[test]
    fn test_nested_change_targets_the_leaf() {
        let before = json!({"spec": {"template": {"spec": {"version": "v1.28.0", "replicas": 3}}}});
        let after = json!({"spec": {"template": {"spec": {"version": "v1.29.0", "replicas": 3}}}});
        let ops = diff(&before, &after);
        assert_eq!(
            ops,
            vec![replace_at(
                &["spec", "template", "spec", "version"],
                json!("v1.29.0")
            )]
        );
    }

    /// Scenario: one add and one remove in the same object, nothing else
    #[test]
    fn test_add_and_remove_in_same_object() {
        let before = json!({"apiVersion": "v1", "kind": "X", "data": {"existingFoo": "bar"}});
        let after = json!({"apiVersion": "v1", "kind": "X", "data": {"foo": "bar"}});
        let ops = diff(&before, &after);
        assert_eq!(ops.len(), 2);
        assert!(ops.contains(&remove_at(&["data", "existingFoo"])));
        assert!(ops.contains(&add_at(&["data", "foo"], json!("bar"))));
    }

    #[test]
    fn test_unrelated_siblings_are_untouched() {
        let before = json!({"a": {"x": 1}, "b": {"y": 2}, "c": 3});
        let after = json!({"a": {"x": 9}, "b": {"y": 2}, "c": 3});
        let ops = diff(&before, &after);
        assert_eq!(ops, vec![replace_at(&["a", "x"], json!(9))]);
    }

    // =========================================================================
    // Arrays are replaced wholesale
    // =========================================================================

    #[test]
    fn test_array_element_change_replaces_the_whole_array() {
        let before = json!({"files": [{"path": "/etc/a"}, {"path": "/etc/b"}]});
        let after = json!({"files": [{"path": "/etc/a"}, {"path": "/etc/c"}]});
        let ops = diff(&before, &after);
        assert_eq!(
            ops,
            vec![replace_at(
                &["files"],
                json!([{"path": "/etc/a"}, {"path": "/etc/c"}])
            )]
        );
    }

    #[test]
    fn test_array_append_replaces_the_whole_array() {
        let ops = diff(&json!({"a": [1]}), &json!({"a": [1, 2]}));
        assert_eq!(ops, vec![replace_at(&["a"], json!([1, 2]))]);
    }

    // =========================================================================
    // Shape changes
    // =========================================================================

    #[test]
    fn test_type_change_is_a_replace() {
        let ops = diff(&json!({"a": {"b": 1}}), &json!({"a": [1]}));
        assert_eq!(ops, vec![replace_at(&["a"], json!([1]))]);

        let ops = diff(&json!({"a": 1}), &json!({"a": {"b": 1}}));
        assert_eq!(ops, vec![replace_at(&["a"], json!({"b": 1}))]);
    }

    #[test]
    fn test_root_type_change_replaces_the_root() {
        let ops = diff(&json!(1), &json!({"a": 1}));
        assert_eq!(ops, vec![replace_at(&[], json!({"a": 1}))]);
    }

    #[test]
    fn test_null_to_value_is_a_replace() {
        let ops = diff(&json!({"a": null}), &json!({"a": "set"}));
        assert_eq!(ops, vec![replace_at(&["a"], json!("set"))]);
    }

    #[test]
    fn test_keys_with_pointer_special_characters() {
        let ops = diff(
            &json!({"metadata": {"annotations": {}}}),
            &json!({"metadata": {"annotations": {"infra/role": "cp", "a~b": 1}}}),
        );
        assert_eq!(ops.len(), 2);
        // Pointer escaping is the library's concern; verify via display form
        let rendered: Vec<String> = ops
            .iter()
            .map(|op| match op {
                PatchOperation::Add(a) => a.path.to_string(),
                _ => panic!("expected add"),
            })
            .collect();
        assert!(rendered.contains(&"/metadata/annotations/a~0b".to_string()));
        assert!(rendered.contains(&"/metadata/annotations/infra~1role".to_string()));
    }

    #[test]
    fn test_multiple_independent_changes() {
        let before = json!({"a": 1, "b": {"c": 2, "d": 3}, "e": [1]});
        let after = json!({"a": 2, "b": {"c": 2}, "e": [1], "f": true});
        let ops = diff(&before, &after);
        assert_eq!(ops.len(), 3);
        assert!(ops.contains(&replace_at(&["a"], json!(2))));
        assert!(ops.contains(&remove_at(&["b", "d"])));
        assert!(ops.contains(&add_at(&["f"], json!(true))));
    }
}
