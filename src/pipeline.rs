//! Ordered application of registered mutators across a request
//!
//! Feature mutators register into a [`MutatorPipeline`] once, in a fixed
//! order that is semantically significant: later entries observe the
//! documents and may depend on side effects written by earlier ones (a
//! typical tail entry finalizes configuration files accumulated by
//! everything before it). For each document the pipeline merges the
//! document's override variables over the request-global bag and runs
//! every mutator in registration order; a failing mutator aborts the rest
//! of the chain for that document without rolling back what already
//! applied, and the remaining documents still run.

use tracing::{debug, error};

use crate::document::{Document, HolderContext};
use crate::vars::merge::merge;
use crate::vars::VariableBag;
use crate::Result;

/// A feature mutator: reads variables, branches on shape, and edits
/// documents through the engine
///
/// Implementations are expected to be thin — fetch inputs from the bag,
/// then call [`crate::mutate_if_applicable`] once per document role they
/// target. `Send + Sync` so a caller may process independent documents in
/// parallel; the pipeline itself stays single-threaded per document.
pub trait Mutator: Send + Sync {
    /// Stable name used in logs and diagnostics
    fn name(&self) -> &str;

    /// Apply this mutator to one document
    fn mutate(
        &self,
        document: &mut Document,
        variables: &VariableBag,
        holder: &HolderContext,
    ) -> Result<()>;
}

/// One document of a request together with its positional metadata and
/// per-document override variables
#[derive(Debug, Clone)]
pub struct RequestItem {
    /// The document to mutate
    pub document: Document,
    /// Owner metadata for selector matching
    pub holder: HolderContext,
    /// Override variables scoped to this document (higher precedence than
    /// the request-global bag)
    pub variables: VariableBag,
}

impl RequestItem {
    /// Create a request item with no override variables
    pub fn new(document: Document, holder: HolderContext) -> Self {
        Self {
            document,
            holder,
            variables: VariableBag::new(),
        }
    }

    /// Attach per-document override variables
    pub fn with_variables(mut self, variables: VariableBag) -> Self {
        self.variables = variables;
        self
    }
}

/// A full mutation request: global variables plus the documents to process
#[derive(Debug, Clone, Default)]
pub struct MutationRequest {
    /// Request-global variables (lowest precedence)
    pub variables: VariableBag,
    /// Documents to mutate, each with its own holder and overrides
    pub items: Vec<RequestItem>,
}

impl MutationRequest {
    /// Create a request with the given global variables
    pub fn new(variables: VariableBag) -> Self {
        Self {
            variables,
            items: Vec::new(),
        }
    }

    /// Add a document to the request
    pub fn push(&mut self, item: RequestItem) {
        self.items.push(item);
    }
}

/// Registration-ordered list of mutators
#[derive(Default)]
pub struct MutatorPipeline {
    mutators: Vec<Box<dyn Mutator>>,
}

impl MutatorPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mutator; entries run in registration order
    pub fn register(mut self, mutator: impl Mutator + 'static) -> Self {
        self.mutators.push(Box::new(mutator));
        self
    }

    /// Number of registered mutators
    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    /// Whether no mutators are registered
    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }

    /// Run every mutator, in order, against a single document
    ///
    /// Each mutator observes the document as left by all previous ones.
    /// The first failure aborts the chain for this document; changes
    /// already applied are not rolled back.
    pub fn run_document(
        &self,
        document: &mut Document,
        variables: &VariableBag,
        holder: &HolderContext,
    ) -> Result<()> {
        for mutator in &self.mutators {
            debug!(
                mutator = mutator.name(),
                kind = %document.kind,
                name = %document.name,
                "applying mutator"
            );
            if let Err(e) = mutator.mutate(document, variables, holder) {
                error!(
                    mutator = mutator.name(),
                    kind = %document.kind,
                    name = %document.name,
                    error = %e,
                    "mutator failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Run the pipeline over every document of a request
    ///
    /// Each document gets its override variables merged over the request
    /// globals. Documents are independent: a failure on one is recorded
    /// and the remaining documents still run; the first error (if any) is
    /// returned after all documents were attempted.
    pub fn run(&self, request: &mut MutationRequest) -> Result<()> {
        let mut first_error = None;
        for item in &mut request.items {
            let variables = merge(&item.variables, &request.variables);
            if let Err(e) = self.run_document(&mut item.document, &variables, &item.holder) {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
