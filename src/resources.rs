//! Shared shapes for composed cluster resources
//!
//! Every definition the composer emits carries its own apiVersion/kind, an
//! [`ObjectMeta`], and is rendered to camelCase JSON for the reconciler.

use std::collections::BTreeMap;

use kube::core::ApiResource;
use serde::{Deserialize, Serialize};

use crate::crd::EnvVarSpec;

// =============================================================================
// ObjectMeta
// =============================================================================

/// Kubernetes ObjectMeta for composed resources
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Create bare metadata; stamping adds the managed labels
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// References and small shared types
// =============================================================================

/// Reference to another object, usually an ImageStreamTag
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Referenced kind
    pub kind: String,
    /// Referenced name
    pub name: String,
    /// Referenced namespace, when outside the referrer's own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectReference {
    /// Reference an ImageStreamTag in the referrer's namespace
    pub fn image_stream_tag(name: impl Into<String>) -> Self {
        Self {
            kind: crate::IMAGE_STREAM_TAG_KIND.to_string(),
            name: name.into(),
            namespace: None,
        }
    }

    /// Place the reference in another namespace
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Environment variable
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    /// Variable name
    pub name: String,
    /// Variable value
    pub value: String,
}

impl From<&EnvVarSpec> for EnvVar {
    fn from(spec: &EnvVarSpec) -> Self {
        Self {
            name: spec.name.clone(),
            value: spec.value.clone(),
        }
    }
}

/// Convert spec environment variables into container environment variables
pub fn env_vars(specs: &[EnvVarSpec]) -> Vec<EnvVar> {
    specs.iter().map(EnvVar::from).collect()
}

// =============================================================================
// HasApiResource Trait
// =============================================================================

/// Types with a compile-time known apiVersion and kind.
///
/// The reconciler uses [`HasApiResource::api_resource`] to address the
/// definition through a dynamic API without a typed client.
pub trait HasApiResource {
    /// Full API version (e.g. "build.openshift.io/v1", "v1")
    const API_VERSION: &'static str;
    /// Resource kind (e.g. "BuildConfig")
    const KIND: &'static str;

    /// Build an ApiResource from the type's constants.
    fn api_resource() -> ApiResource {
        build_api_resource(Self::API_VERSION, Self::KIND)
    }
}

/// Build an ApiResource from an apiVersion string and kind
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    };
    ApiResource {
        group,
        version,
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        plural: format!("{}s", kind.to_lowercase()),
    }
}
