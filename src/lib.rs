//! Composable mutators for Kubernetes-style cluster template documents
//!
//! Cluster topologies are assembled from loosely typed template documents
//! (control-plane templates, worker machine templates, infrastructure
//! templates) that many independent mutators edit during a single
//! request/response hook. Each mutator wants a strongly typed view of "its"
//! document, but the wire format is a partially unknown JSON tree that other
//! mutators may already have extended with fields the view knows nothing
//! about.
//!
//! This crate is the machinery that makes that safe and composable:
//!
//! - [`Selector`] decides whether a mutator applies to a document at all,
//!   based on the role the document plays in the request.
//! - [`mutate_if_applicable`] projects a document onto a typed view, runs a
//!   mutation closure, diffs the before/after serializations into a minimal
//!   RFC 6902 edit script, and applies that script back onto the *original*
//!   untyped tree so unknown fields survive byte-for-byte.
//! - [`VariableBag`] holds named, arbitrarily shaped JSON inputs with typed
//!   nested get/set, and [`merge`] combines a per-component override bag
//!   with a cluster-wide fallback bag deterministically.
//! - [`MutatorPipeline`] applies a registration-ordered list of mutators to
//!   every document in a request, each mutator seeing the cumulative effect
//!   of all prior ones.
//!
//! Everything here is synchronous and performs no I/O; a mutation closure
//! may block on its own reads, which the engine simply surfaces.

#![deny(missing_docs)]

pub mod document;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod selector;
pub mod vars;
pub mod yaml;

pub use document::{Document, DocumentRole, HolderContext};
pub use engine::{mutate_if_applicable, Outcome, SkipReason};
pub use error::Error;
pub use pipeline::{MutationRequest, Mutator, MutatorPipeline, RequestItem};
pub use selector::{MatchTarget, Selector};
pub use vars::merge::merge;
pub use vars::VariableBag;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Name of the variable carrying request-scoped builtin metadata
/// (cluster name, worker class, and similar values populated by the
/// request-decoding layer rather than by user configuration).
pub const BUILTIN_VARIABLE: &str = "builtin";
