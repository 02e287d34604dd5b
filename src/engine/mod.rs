//! Typed mutate-diff-apply engine
//!
//! The engine lets a mutator edit a document through a strongly typed view
//! without destroying fields the view does not declare. It projects the
//! untyped tree onto the view, runs the mutation closure, diffs the
//! before/after serializations into a minimal edit script, and applies that
//! script back onto the original tree. Replacing the whole subtree the view
//! covers would drop sibling data added by earlier mutators and would
//! re-materialize every defaulted field as an explicit deletion; the
//! diff-based path touches only what the closure actually changed.

pub mod apply;
pub mod diff;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::document::{Document, HolderContext};
use crate::error::Error;
use crate::selector::Selector;
use crate::vars::VariableBag;
use crate::Result;

/// Why a mutation attempt was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The selector did not match the document's role
    SelectorMismatch,
    /// The document matched the selector but does not fit the typed view
    ShapeMismatch,
}

/// Result of a single mutation attempt
///
/// Skips are normal control flow — the dominant path for every mutator is
/// "not my document" — and are kept distinguishable from errors so tests
/// and refactors cannot accidentally promote one into the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation ran and its changes were patched into the document
    Applied,
    /// The document was left untouched
    Skipped(SkipReason),
}

impl Outcome {
    /// Whether the mutation ran
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Mutate a document through a typed view if the selector applies
///
/// 1. Evaluate the selector; a non-match is a successful
///    [`Outcome::Skipped`].
/// 2. Project the tree onto `T`. Fields the document carries beyond `T`'s
///    schema are invisible to the projection; a field present with the
///    wrong shape fails it, which is also a tolerant skip (a role match
///    does not guarantee this particular type fits).
/// 3. Serialize the projection, run the closure, serialize again, and diff
///    the two snapshots.
/// 4. Apply the edit script to the original tree, preserving everything
///    `T` does not declare.
///
/// Closure errors are wrapped with the document's kind/name and propagated;
/// serialization or patch failures indicate a broken view definition or an
/// externally modified document and are likewise fatal.
pub fn mutate_if_applicable<T, F>(
    document: &mut Document,
    variables: &VariableBag,
    holder: &HolderContext,
    selector: &Selector,
    mutation: F,
) -> Result<Outcome>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut T) -> Result<()>,
{
    if !selector.matches(document, holder, variables) {
        debug!(
            kind = %document.kind,
            name = %document.name,
            "selector did not match, skipping"
        );
        return Ok(Outcome::Skipped(SkipReason::SelectorMismatch));
    }

    let mut typed: T = match serde_json::from_value(document.tree.clone()) {
        Ok(typed) => typed,
        Err(e) => {
            debug!(
                kind = %document.kind,
                name = %document.name,
                error = %e,
                "document does not fit the typed view, skipping"
            );
            return Ok(Outcome::Skipped(SkipReason::ShapeMismatch));
        }
    };

    let before = serde_json::to_value(&typed)
        .map_err(|e| Error::serialization_for_kind(&document.kind, e.to_string()))?;

    mutation(&mut typed).map_err(|e| Error::mutation(&document.kind, &document.name, e))?;

    let after = serde_json::to_value(&typed)
        .map_err(|e| Error::serialization_for_kind(&document.kind, e.to_string()))?;

    let ops = diff::diff(&before, &after);
    apply::apply(&mut document.tree, &ops)?;
    Ok(Outcome::Applied)
}
