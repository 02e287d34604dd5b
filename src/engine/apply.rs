//! Tolerant application of an edit script onto the original document tree
//!
//! The edit script is computed between two serializations of a typed view,
//! but it is applied to the original untyped document, which may omit
//! fields the view serializes with defaults. Application therefore upserts:
//! `add` and `replace` both set the target, creating intermediate objects
//! as needed, and `remove` of an already-absent path is a no-op. Genuine
//! inconsistencies — indexing into a scalar, an out-of-range array index —
//! are fatal.

use json_patch::PatchOperation;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::Result;

/// Apply an edit script to a JSON tree in place
pub fn apply(tree: &mut Value, ops: &[PatchOperation]) -> Result<()> {
    for op in ops {
        match op {
            PatchOperation::Add(add) => upsert(tree, &tokens(&add.path.to_string()), add.value.clone())?,
            PatchOperation::Replace(replace) => {
                upsert(tree, &tokens(&replace.path.to_string()), replace.value.clone())?
            }
            PatchOperation::Remove(remove) => remove_path(tree, &tokens(&remove.path.to_string())),
            other => {
                return Err(Error::patch(
                    render(other),
                    "operation is not produced by the structural diff",
                ))
            }
        }
    }
    Ok(())
}

/// Split a JSON Pointer into decoded reference tokens
fn tokens(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn render(op: &PatchOperation) -> String {
    serde_json::to_string(op).unwrap_or_else(|_| "<unrenderable>".to_string())
}

fn pointer_of(path: &[String]) -> String {
    let mut out = String::new();
    for token in path {
        out.push('/');
        out.push_str(&token.replace('~', "~0").replace('/', "~1"));
    }
    out
}

/// Set the value at `path`, creating missing intermediate objects
fn upsert(tree: &mut Value, path: &[String], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return Ok(());
    };

    let mut current = tree;
    for (depth, key) in parents.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
            Value::Array(items) => {
                let index: usize = key.parse().map_err(|_| {
                    Error::patch(pointer_of(&path[..=depth]), "invalid array index")
                })?;
                items.get_mut(index).ok_or_else(|| {
                    Error::patch(pointer_of(&path[..=depth]), "array index out of bounds")
                })?
            }
            _ => {
                return Err(Error::patch(
                    pointer_of(&path[..=depth]),
                    "cannot traverse a non-container value",
                ))
            }
        };
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            if last.as_str() == "-" {
                items.push(value);
                return Ok(());
            }
            let index: usize = last
                .parse()
                .map_err(|_| Error::patch(pointer_of(path), "invalid array index"))?;
            if index < items.len() {
                items[index] = value;
                Ok(())
            } else if index == items.len() {
                items.push(value);
                Ok(())
            } else {
                Err(Error::patch(pointer_of(path), "array index out of bounds"))
            }
        }
        _ => Err(Error::patch(
            pointer_of(path),
            "cannot set a field on a non-container value",
        )),
    }
}

/// Remove the value at `path`; absent paths are a no-op
fn remove_path(tree: &mut Value, path: &[String]) {
    let Some((last, parents)) = path.split_last() else {
        // Root removal is never produced by the structural diff
        return;
    };

    let mut current = tree;
    for key in parents {
        current = match current {
            Value::Object(map) => match map.get_mut(key) {
                Some(next) => next,
                None => return,
            },
            Value::Array(items) => {
                let Ok(index) = key.parse::<usize>() else {
                    return;
                };
                match items.get_mut(index) {
                    Some(next) => next,
                    None => return,
                }
            }
            _ => return,
        };
    }

    match current {
        Value::Object(map) => {
            map.remove(last);
        }
        Value::Array(items) => {
            if let Ok(index) = last.parse::<usize>() {
                if index < items.len() {
                    items.remove(index);
                }
            }
        }
        _ => {}
    }
}
