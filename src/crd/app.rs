//! KogitoApp Custom Resource Definition
//!
//! A KogitoApp describes one Kogito service: where its sources live, which
//! runtime it targets and how it should run once built.

use kube::core::{CustomResourceExt, ResourceExt};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{BuildSpec, EnvVarSpec, ResourcesSpec, RuntimeType};
use crate::Error;

/// Specification for a KogitoApp
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "app.kiegroup.org",
    version = "v1alpha1",
    kind = "KogitoApp",
    plural = "kogitoapps",
    shortname = "kapp",
    namespaced,
    printcolumn = r#"{"name":"Runtime","type":"string","jsonPath":".spec.runtime"}"#,
    printcolumn = r#"{"name":"Replicas","type":"integer","jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KogitoAppSpec {
    /// Runtime platform (quarkus or springboot)
    #[serde(default)]
    pub runtime: RuntimeType,

    /// Desired replica count; one when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,

    /// Runtime environment variables for the service container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVarSpec>,

    /// Container resource requests and limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesSpec>,

    /// How to build the service image
    pub build: BuildSpec,
}

impl KogitoApp {
    /// Application name, taken from the resource name
    pub fn app_name(&self) -> Result<&str, Error> {
        match self.metadata.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::validation("KogitoApp has no name")),
        }
    }

    /// Namespace every composed resource lands in
    pub fn target_namespace(&self) -> Result<&str, Error> {
        match self.metadata.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => Ok(ns),
            _ => Err(Error::validation(format!(
                "KogitoApp {} has no namespace",
                self.name_any()
            ))),
        }
    }

    /// Check everything the builders read unconditionally
    pub fn validate(&self) -> Result<(), Error> {
        let name = self.app_name()?;
        self.target_namespace()?;
        if self.spec.build.git_source.uri.trim().is_empty() {
            return Err(Error::validation(format!(
                "KogitoApp {name} has no git source URI"
            )));
        }
        Ok(())
    }

    /// Render the CustomResourceDefinition as YAML-ready JSON
    pub fn crd_manifest() -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(Self::crd())?)
    }
}
