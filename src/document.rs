//! Documents under mutation and their positional metadata
//!
//! A [`Document`] is a loosely typed JSON tree plus the identity and role
//! metadata the request-decoding layer attaches to it. The tree is the
//! single source of truth: typed views are projections created per
//! mutation attempt and never stored.

use kube::core::DynamicObject;
use serde_json::Value;

use crate::error::Error;
use crate::yaml;
use crate::Result;

/// Role a document plays within the overall request
///
/// Assigned by the request-decoding layer from the position the document's
/// template occupies in the topology. Worker roles carry the machine
/// deployment class when the decoding layer knows it; when absent, the
/// selector matcher falls back to the `builtin` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRole {
    /// The control-plane template itself
    ControlPlaneTemplate,
    /// The infrastructure-cluster template
    InfrastructureClusterTemplate,
    /// The infrastructure machine template backing the control plane
    ControlPlaneMachineTemplate,
    /// An infrastructure machine template for a worker machine deployment
    WorkerMachineTemplate {
        /// Machine deployment class, if known at decode time
        class: Option<String>,
    },
    /// A bootstrap config template for a worker machine deployment
    WorkerBootstrapTemplate {
        /// Machine deployment class, if known at decode time
        class: Option<String>,
    },
}

/// Metadata describing which higher-level object owns the current document
/// and through which field path
///
/// Read-only input to selector matching; never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderContext {
    /// API version of the owning object
    pub api_version: String,
    /// Kind of the owning object
    pub kind: String,
    /// Name of the owning object
    pub name: String,
    /// Namespace of the owning object, if namespaced
    pub namespace: Option<String>,
    /// Field path in the owner that references this document
    /// (e.g. `spec.controlPlaneRef`)
    pub field_path: String,
}

impl HolderContext {
    /// Create a holder context for a cluster-scoped owner
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
            namespace: None,
            field_path: field_path.into(),
        }
    }

    /// Set the owner's namespace
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// A loosely typed template document plus identifying metadata
///
/// The `tree` may contain fields no typed view declares; every mutation
/// preserves them exactly. Callers treat prior references to the tree as
/// stale after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// API group/version of the document
    pub api_version: String,
    /// Kind of the document
    pub kind: String,
    /// Name of the document
    pub name: String,
    /// Namespace of the document, if namespaced
    pub namespace: Option<String>,
    /// Role this document plays in the request
    pub role: DocumentRole,
    /// The untyped JSON tree being mutated
    pub tree: Value,
}

impl Document {
    /// Create a document from an already-parsed JSON tree
    ///
    /// Identity metadata (`apiVersion`, `kind`, `metadata.name`,
    /// `metadata.namespace`) is read out of the tree itself; a tree without
    /// `apiVersion` or `kind` is rejected.
    pub fn from_tree(tree: Value, role: DocumentRole) -> Result<Self> {
        let api_version = tree
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::serialization("document is missing apiVersion"))?
            .to_string();
        let kind = tree
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::serialization("document is missing kind"))?
            .to_string();
        let name = tree
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let namespace = tree
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
            .map(String::from);
        Ok(Self {
            api_version,
            kind,
            name,
            namespace,
            role,
            tree,
        })
    }

    /// Create a document by parsing a YAML manifest
    pub fn from_yaml(input: &str, role: DocumentRole) -> Result<Self> {
        Self::from_tree(yaml::parse_yaml(input)?, role)
    }

    /// Create a document from a dynamic Kubernetes object
    ///
    /// This is the seam to the request-decoding layer, which hands
    /// templates around as [`DynamicObject`]s.
    pub fn from_object(object: &DynamicObject, role: DocumentRole) -> Result<Self> {
        let types = object
            .types
            .as_ref()
            .ok_or_else(|| Error::serialization("object is missing apiVersion/kind"))?;
        let tree = serde_json::to_value(object)
            .map_err(|e| Error::serialization_for_kind(&types.kind, e.to_string()))?;
        Ok(Self {
            api_version: types.api_version.clone(),
            kind: types.kind.clone(),
            name: object.metadata.name.clone().unwrap_or_default(),
            namespace: object.metadata.namespace.clone(),
            role,
            tree,
        })
    }

    /// Convert the mutated tree back into a dynamic Kubernetes object
    pub fn into_object(self) -> Result<DynamicObject> {
        let kind = self.kind;
        serde_json::from_value(self.tree)
            .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CP_TEMPLATE: &str = r#"
apiVersion: controlplane.cluster.x-k8s.io/v1beta1
kind: KubeadmControlPlaneTemplate
metadata:
  name: cp-template
  namespace: default
spec:
  template:
    spec: {}
"#;

    #[test]
    fn test_from_yaml_extracts_identity() {
        let doc = Document::from_yaml(CP_TEMPLATE, DocumentRole::ControlPlaneTemplate).unwrap();
        assert_eq!(doc.api_version, "controlplane.cluster.x-k8s.io/v1beta1");
        assert_eq!(doc.kind, "KubeadmControlPlaneTemplate");
        assert_eq!(doc.name, "cp-template");
        assert_eq!(doc.namespace.as_deref(), Some("default"));
        assert_eq!(doc.role, DocumentRole::ControlPlaneTemplate);
    }

    #[test]
    fn test_from_tree_requires_api_version_and_kind() {
        let err = Document::from_tree(json!({"kind": "X"}), DocumentRole::ControlPlaneTemplate)
            .unwrap_err();
        assert!(err.to_string().contains("apiVersion"));

        let err = Document::from_tree(
            json!({"apiVersion": "v1"}),
            DocumentRole::ControlPlaneTemplate,
        )
        .unwrap_err();
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn test_name_and_namespace_are_optional() {
        let doc = Document::from_tree(
            json!({"apiVersion": "v1", "kind": "X"}),
            DocumentRole::InfrastructureClusterTemplate,
        )
        .unwrap();
        assert_eq!(doc.name, "");
        assert_eq!(doc.namespace, None);
    }

    #[test]
    fn test_dynamic_object_round_trip() {
        let obj: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "infrastructure.cluster.x-k8s.io/v1beta1",
            "kind": "DockerClusterTemplate",
            "metadata": {"name": "docker-cluster", "namespace": "default"},
            "spec": {"template": {"spec": {"loadBalancer": {}}}}
        }))
        .unwrap();

        let doc =
            Document::from_object(&obj, DocumentRole::InfrastructureClusterTemplate).unwrap();
        assert_eq!(doc.kind, "DockerClusterTemplate");
        assert_eq!(doc.name, "docker-cluster");
        assert_eq!(
            doc.tree["spec"]["template"]["spec"],
            json!({"loadBalancer": {}})
        );

        let back = doc.into_object().unwrap();
        assert_eq!(back.types.as_ref().unwrap().kind, "DockerClusterTemplate");
        assert_eq!(back.metadata.name.as_deref(), Some("docker-cluster"));
    }

    #[test]
    fn test_from_object_rejects_missing_types() {
        let obj: DynamicObject = serde_json::from_value(json!({
            "metadata": {"name": "anonymous"}
        }))
        .unwrap();
        let err = Document::from_object(&obj, DocumentRole::ControlPlaneTemplate).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn test_holder_context_builder() {
        let holder = HolderContext::new(
            "cluster.x-k8s.io/v1beta1",
            "Cluster",
            "my-cluster",
            "spec.controlPlaneRef",
        )
        .in_namespace("default");
        assert_eq!(holder.kind, "Cluster");
        assert_eq!(holder.namespace.as_deref(), Some("default"));
        assert_eq!(holder.field_path, "spec.controlPlaneRef");
    }
}
