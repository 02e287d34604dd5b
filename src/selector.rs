//! Selectors: declarative predicates over document roles
//!
//! A mutator constructs one [`Selector`] per document role it cares about
//! and hands it to the engine, which evaluates it before doing any typed
//! work. Matching is a pure function of the selector, the document's role,
//! and the holder context — no I/O, no side effects. An unmatched selector
//! is not a failure, it is the normal "not my document" signal.

use crate::document::{Document, DocumentRole, HolderContext};
use crate::vars::VariableBag;
use crate::BUILTIN_VARIABLE;

/// Kind of the object owning control-plane and infrastructure-cluster
/// template references
pub const CLUSTER_KIND: &str = "Cluster";
/// Kind of the object owning worker template references
pub const MACHINE_DEPLOYMENT_KIND: &str = "MachineDeployment";

/// Holder field path referencing the control-plane template
pub const CONTROL_PLANE_REF_FIELD: &str = "spec.controlPlaneRef";
/// Holder field path referencing the infrastructure-cluster template
pub const INFRASTRUCTURE_REF_FIELD: &str = "spec.infrastructureRef";
/// Holder field path referencing the control plane's machine template
pub const CONTROL_PLANE_MACHINE_INFRA_FIELD: &str = "spec.machineTemplate.infrastructureRef";
/// Holder field path referencing a worker machine template
pub const WORKER_MACHINE_INFRA_FIELD: &str = "spec.template.spec.infrastructureRef";
/// Holder field path referencing a worker bootstrap config template
pub const WORKER_BOOTSTRAP_CONFIG_FIELD: &str = "spec.template.spec.bootstrap.configRef";

/// Wildcard worker-class pattern matching any class
pub const ANY_CLASS: &str = "*";

/// Which position in the topology a selector targets
///
/// Exactly one discriminator per selector, guaranteed by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTarget {
    /// The control-plane template
    ControlPlane,
    /// The infrastructure-cluster template
    InfrastructureCluster,
    /// The infrastructure machine template backing the control plane
    ControlPlaneMachineTemplate,
    /// An infrastructure machine template for worker classes matching the
    /// pattern (`"*"` matches any class)
    WorkerMachineTemplate {
        /// Worker class name or the `"*"` wildcard
        class_pattern: String,
    },
    /// A bootstrap config template for worker classes matching the pattern
    /// (`"*"` matches any class)
    WorkerBootstrapTemplate {
        /// Worker class name or the `"*"` wildcard
        class_pattern: String,
    },
}

/// Predicate describing which document roles a mutator targets
///
/// Immutable value object, constructed once per mutator through the
/// per-discriminator constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// API version the targeted template must have
    pub api_version: String,
    /// Kind the targeted template must have
    pub kind: String,
    /// Positional discriminator
    pub target: MatchTarget,
}

impl Selector {
    /// Select the control-plane template of the given apiVersion/kind
    pub fn control_plane(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            target: MatchTarget::ControlPlane,
        }
    }

    /// Select the infrastructure-cluster template of the given
    /// apiVersion/kind
    pub fn infrastructure_cluster(
        api_version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            target: MatchTarget::InfrastructureCluster,
        }
    }

    /// Select the control plane's infrastructure machine template
    pub fn control_plane_machine_template(
        api_version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            target: MatchTarget::ControlPlaneMachineTemplate,
        }
    }

    /// Select worker machine templates whose class matches the pattern
    pub fn worker_machine_template(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        class_pattern: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            target: MatchTarget::WorkerMachineTemplate {
                class_pattern: class_pattern.into(),
            },
        }
    }

    /// Select worker bootstrap config templates whose class matches the
    /// pattern
    pub fn worker_bootstrap_template(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        class_pattern: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            target: MatchTarget::WorkerBootstrapTemplate {
                class_pattern: class_pattern.into(),
            },
        }
    }

    /// Decide whether this selector applies to the given document
    ///
    /// Pure and deterministic. The apiVersion and kind must both match
    /// exactly, the document's role must correspond to the selector's
    /// target, and the holder context must be consistent with that role's
    /// well-known reference position. For worker targets the class pattern
    /// is checked against the role's class, falling back to the `builtin`
    /// variable's `machineDeployment.class` when the role does not carry
    /// one; an unresolvable class is a non-match, never an error.
    pub fn matches(
        &self,
        document: &Document,
        holder: &HolderContext,
        variables: &VariableBag,
    ) -> bool {
        if self.api_version != document.api_version || self.kind != document.kind {
            return false;
        }
        match (&self.target, &document.role) {
            (MatchTarget::ControlPlane, DocumentRole::ControlPlaneTemplate) => {
                holder.kind == CLUSTER_KIND && holder.field_path == CONTROL_PLANE_REF_FIELD
            }
            (MatchTarget::InfrastructureCluster, DocumentRole::InfrastructureClusterTemplate) => {
                holder.kind == CLUSTER_KIND && holder.field_path == INFRASTRUCTURE_REF_FIELD
            }
            (
                MatchTarget::ControlPlaneMachineTemplate,
                DocumentRole::ControlPlaneMachineTemplate,
            ) => holder.field_path == CONTROL_PLANE_MACHINE_INFRA_FIELD,
            (
                MatchTarget::WorkerMachineTemplate { class_pattern },
                DocumentRole::WorkerMachineTemplate { class },
            ) => {
                holder.kind == MACHINE_DEPLOYMENT_KIND
                    && holder.field_path == WORKER_MACHINE_INFRA_FIELD
                    && class_matches(class_pattern, class, variables)
            }
            (
                MatchTarget::WorkerBootstrapTemplate { class_pattern },
                DocumentRole::WorkerBootstrapTemplate { class },
            ) => {
                holder.kind == MACHINE_DEPLOYMENT_KIND
                    && holder.field_path == WORKER_BOOTSTRAP_CONFIG_FIELD
                    && class_matches(class_pattern, class, variables)
            }
            _ => false,
        }
    }
}

/// Check a worker-class pattern against the document's class, resolving
/// the class through the builtin variable when the role does not carry it
fn class_matches(pattern: &str, role_class: &Option<String>, variables: &VariableBag) -> bool {
    if pattern == ANY_CLASS {
        return true;
    }
    let resolved = match role_class {
        Some(class) => Some(class.clone()),
        None => variables
            .get::<String>(BUILTIN_VARIABLE, &["machineDeployment", "class"])
            .ok(),
    };
    resolved.as_deref() == Some(pattern)
}
