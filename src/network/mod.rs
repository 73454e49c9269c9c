//! Network exposure for a Kogito service
//!
//! The cluster-internal Service mirrors the deployment's container ports one
//! for one. The Route then exposes that Service outside the cluster over its
//! `http` port. Neither can be composed from nothing: a deployment without
//! ports has nothing to expose, and a route needs a service to target.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::meta::stamp;
use crate::resources::{HasApiResource, ObjectMeta};
use crate::workload::{DeploymentConfig, DEFAULT_EXPOSED_PROTOCOL};
use crate::Error;

/// Services are only reachable inside the cluster
pub const SERVICE_TYPE_CLUSTER_IP: &str = "ClusterIP";

// =============================================================================
// Service
// =============================================================================

/// Kubernetes Service
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: ServiceSpec,
}

impl HasApiResource for Service {
    const API_VERSION: &'static str = "v1";
    const KIND: &'static str = "Service";
}

/// Service spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Selector
    pub selector: BTreeMap<String, String>,
    /// Ports
    pub ports: Vec<ServicePort>,
    /// Service type
    #[serde(rename = "type")]
    pub type_: String,
}

/// Service port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// Port name
    pub name: String,
    /// Protocol
    pub protocol: String,
    /// Port number
    pub port: u16,
    /// Container port traffic is sent to
    pub target_port: u16,
}

// =============================================================================
// Route
// =============================================================================

/// OpenShift Route
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: RouteSpec,
}

impl HasApiResource for Route {
    const API_VERSION: &'static str = "route.openshift.io/v1";
    const KIND: &'static str = "Route";
}

/// Route spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Backend the route sends traffic to
    pub to: RouteTargetReference,
    /// Backend port
    pub port: RoutePort,
}

/// Route backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTargetReference {
    /// Backend kind (Service)
    pub kind: String,
    /// Backend name
    pub name: String,
}

/// Route backend port, by name
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    /// Named service port
    pub target_port: String,
}

// =============================================================================
// Network Compiler
// =============================================================================

/// Composes the Service and Route exposing a deployment
pub struct NetworkCompiler;

impl NetworkCompiler {
    /// Compose the cluster-internal Service for a deployment
    pub fn compile_service(app_name: &str, deployment: &DeploymentConfig) -> Result<Service, Error> {
        let ports: Vec<ServicePort> = deployment
            .main_container()
            .map(|container| {
                container
                    .ports
                    .iter()
                    .map(|port| ServicePort {
                        name: port.name.clone(),
                        protocol: port.protocol.clone(),
                        port: port.container_port,
                        target_port: port.container_port,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if ports.is_empty() {
            return Err(Error::missing_dependency(
                format!("Service {}", deployment.metadata.name),
                format!(
                    "exposed ports on DeploymentConfig {}",
                    deployment.metadata.name
                ),
            ));
        }

        debug!(app = app_name, ports = ports.len(), "composed service");
        Ok(Service {
            api_version: Service::API_VERSION.to_string(),
            kind: Service::KIND.to_string(),
            metadata: stamp(deployment.metadata.clone(), app_name),
            spec: ServiceSpec {
                selector: deployment.spec.selector.clone(),
                ports,
                type_: SERVICE_TYPE_CLUSTER_IP.to_string(),
            },
        })
    }

    /// Compose the external Route for a composed Service
    pub fn compile_route(app_name: &str, service: Option<&Service>) -> Result<Route, Error> {
        let service = service.ok_or_else(|| {
            Error::missing_dependency(format!("Route for KogitoApp {app_name}"), "Service")
        })?;

        debug!(app = app_name, service = %service.metadata.name, "composed route");
        Ok(Route {
            api_version: Route::API_VERSION.to_string(),
            kind: Route::KIND.to_string(),
            metadata: stamp(service.metadata.clone(), app_name),
            spec: RouteSpec {
                to: RouteTargetReference {
                    kind: Service::KIND.to_string(),
                    name: service.metadata.name.clone(),
                },
                port: RoutePort {
                    target_port: DEFAULT_EXPOSED_PROTOCOL.to_string(),
                },
            },
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
