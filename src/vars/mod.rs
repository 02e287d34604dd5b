//! Variable bags: named, arbitrarily shaped JSON inputs for mutators
//!
//! A bag maps variable names to raw JSON values. Mutators read through
//! [`VariableBag::get`] with an optional nested field path, and write
//! through [`VariableBag::set`]. `set` mutates the bag in place for the
//! single key being written; the orchestrator hands each mutator a merged
//! bag scoped to the current document, so writes never alias across
//! documents.

pub mod merge;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::Result;

/// A mapping from variable name to a raw JSON value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableBag(BTreeMap<String, Value>);

impl VariableBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables in the bag
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag holds no variables
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the bag holds a variable with the given name
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get the raw JSON value of a variable, if present
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Insert a raw JSON value, replacing any existing value wholesale
    pub fn insert_raw(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Iterate over (name, raw value) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read a variable, optionally navigating a nested field path, into `T`
    ///
    /// Fails with [`Error::VariableNotFound`] when the variable is absent
    /// and [`Error::FieldNotFound`] when an intermediate path segment is
    /// absent; both satisfy [`Error::is_not_found`]. A value that is present
    /// but does not deserialize into `T` is an [`Error::TypeMismatch`],
    /// which callers treat as fatal.
    pub fn get<T: DeserializeOwned>(&self, name: &str, path: &[&str]) -> Result<T> {
        let mut current = self
            .0
            .get(name)
            .ok_or_else(|| Error::variable_not_found(name))?;
        let mut walked: Vec<&str> = Vec::with_capacity(path.len());
        for key in path {
            walked.push(*key);
            current = current
                .as_object()
                .and_then(|m| m.get(*key))
                .ok_or_else(|| Error::field_not_found(name, walked.join(".")))?;
        }
        serde_json::from_value(current.clone())
            .map_err(|e| Error::type_mismatch(name, path.join("."), e.to_string()))
    }

    /// Write a value into a variable at an optional nested field path
    ///
    /// With an empty path, replaces the variable wholesale. Otherwise
    /// navigates into the existing value (starting from an empty object if
    /// the variable is absent or null), creating intermediate objects as
    /// needed. Writing through an existing non-object intermediate is an
    /// [`Error::TypeMismatch`] rather than a silent overwrite.
    pub fn set<T: Serialize>(&mut self, name: &str, path: &[&str], value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| Error::type_mismatch(name, path.join("."), e.to_string()))?;

        if path.is_empty() {
            self.0.insert(name.to_string(), encoded);
            return Ok(());
        }

        let root = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        let (last, intermediate) = path.split_last().expect("path is non-empty");
        let mut current = root;
        let mut walked: Vec<&str> = Vec::with_capacity(path.len());
        for key in intermediate {
            walked.push(*key);
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let map = match current {
                Value::Object(map) => map,
                _ => {
                    return Err(Error::type_mismatch(
                        name,
                        walked.join("."),
                        "cannot set through a non-object value",
                    ))
                }
            };
            current = map.entry((*key).to_string()).or_insert(Value::Null);
        }

        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        match current {
            Value::Object(map) => {
                map.insert((*last).to_string(), encoded);
                Ok(())
            }
            _ => Err(Error::type_mismatch(
                name,
                path.join("."),
                "cannot set a field on a non-object value",
            )),
        }
    }
}

impl From<BTreeMap<String, Value>> for VariableBag {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for VariableBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
