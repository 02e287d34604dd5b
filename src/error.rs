//! Error types for template mutation
//!
//! Errors are structured with fields to aid debugging in production.
//! Two variants — [`Error::VariableNotFound`] and [`Error::FieldNotFound`] —
//! are recoverable by convention: feature mutators check them through
//! [`Error::is_not_found`] and treat them as "feature not configured".
//! Every other variant is fatal and is propagated, never swallowed.

use thiserror::Error;

/// Main error type for mutation operations
#[derive(Debug, Error)]
pub enum Error {
    /// A named variable is absent from the bag
    #[error("variable \"{name}\" not found")]
    VariableNotFound {
        /// Name of the missing variable
        name: String,
    },

    /// A nested field is absent within an existing variable
    #[error("field \"{path}\" not found in variable \"{name}\"")]
    FieldNotFound {
        /// Name of the variable being navigated
        name: String,
        /// Dotted path to the first missing segment
        path: String,
    },

    /// A variable or field is present but its shape does not fit the
    /// requested type — a config/schema bug, not an absent feature
    #[error("type mismatch for variable \"{name}\" at \"{path}\": {message}")]
    TypeMismatch {
        /// Name of the variable being read or written
        name: String,
        /// Dotted field path within the variable (empty for the top level)
        path: String,
        /// Description of the shape conflict
        message: String,
    },

    /// A mutation closure failed; carries the target document's identity
    #[error("mutation failed for {kind}/{name}: {source}")]
    Mutation {
        /// Kind of the document being mutated
        kind: String,
        /// Name of the document being mutated
        name: String,
        /// The underlying mutator error
        #[source]
        source: Box<Error>,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The document kind being serialized (if known)
        kind: Option<String>,
    },

    /// Patch application failed against the live document — indicates an
    /// inconsistency between the computed edit script and the tree
    #[error("patch error at \"{path}\": {message}")]
    Patch {
        /// JSON Pointer of the failing operation
        path: String,
        /// Description of what failed
        message: String,
    },

    /// YAML parsing error
    #[error("yaml error: {message}")]
    Yaml {
        /// Description of what failed
        message: String,
    },
}

impl Error {
    /// Create a variable-not-found error
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    /// Create a field-not-found error for a nested path within a variable
    pub fn field_not_found(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::FieldNotFound {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a type-mismatch error for a variable read or write
    pub fn type_mismatch(
        name: impl Into<String>,
        path: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a mutator error with the identity of the document it targeted
    pub fn mutation(kind: impl Into<String>, name: impl Into<String>, source: Error) -> Self {
        Self::Mutation {
            kind: kind.into(),
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error with document kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Create a patch error at the given JSON Pointer
    pub fn patch(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Patch {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a YAML parsing error
    pub fn yaml(msg: impl Into<String>) -> Self {
        Self::Yaml {
            message: msg.into(),
        }
    }

    /// Check whether this error means "the requested value is simply absent"
    ///
    /// True for [`Error::VariableNotFound`] and [`Error::FieldNotFound`]
    /// only. Callers treat these as "nothing to do" while diagnostics can
    /// still distinguish the two kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::VariableNotFound { .. } | Error::FieldNotFound { .. }
        )
    }

    /// Get the variable name if this error is associated with one
    pub fn variable(&self) -> Option<&str> {
        match self {
            Error::VariableNotFound { name } => Some(name),
            Error::FieldNotFound { name, .. } => Some(name),
            Error::TypeMismatch { name, .. } => Some(name),
            _ => None,
        }
    }
}
