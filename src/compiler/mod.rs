//! KogitoApp compiler
//!
//! Composes every cluster resource a KogitoApp needs, in dependency order:
//!
//! ```text
//! S2I build -> runner build ─┐
//! service account ─> role binding
//!                 └──────────┴─> deployment -> service -> route
//! ```
//!
//! Each step receives its predecessors explicitly. The first failure aborts
//! the run and is returned as is; a partial set of resources is never
//! returned. Compilation is pure and synchronous: the reconciler owns all
//! cluster I/O, retries and image inspection.

use std::collections::BTreeMap;

use kube::core::ApiResource;
use serde::Serialize;
use tracing::{debug, info_span};

use crate::build::{BaseImageTable, BuildCompiler, BuildConfig};
use crate::crd::KogitoApp;
use crate::identity::{IdentityCompiler, RoleBinding, ServiceAccount};
use crate::image::DockerImage;
use crate::network::{NetworkCompiler, Route, Service};
use crate::resources::{HasApiResource, ObjectMeta};
use crate::workload::{DeploymentConfig, WorkloadCompiler};
use crate::Error;

// =============================================================================
// Resource kinds
// =============================================================================

/// Kinds of resource a KogitoApp compiles to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// BuildConfig (S2I and runner)
    BuildConfig,
    /// ServiceAccount
    ServiceAccount,
    /// RoleBinding
    RoleBinding,
    /// DeploymentConfig
    DeploymentConfig,
    /// Service
    Service,
    /// Route
    Route,
}

impl ResourceKind {
    /// Kubernetes kind string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildConfig => BuildConfig::KIND,
            Self::ServiceAccount => ServiceAccount::KIND,
            Self::RoleBinding => RoleBinding::KIND,
            Self::DeploymentConfig => DeploymentConfig::KIND,
            Self::Service => Service::KIND,
            Self::Route => Route::KIND,
        }
    }

    /// Kubernetes apiVersion string
    pub fn api_version(&self) -> &'static str {
        match self {
            Self::BuildConfig => BuildConfig::API_VERSION,
            Self::ServiceAccount => ServiceAccount::API_VERSION,
            Self::RoleBinding => RoleBinding::API_VERSION,
            Self::DeploymentConfig => DeploymentConfig::API_VERSION,
            Self::Service => Service::API_VERSION,
            Self::Route => Route::API_VERSION,
        }
    }

    /// Dynamic API coordinates for applying resources of this kind
    pub fn api_resource(&self) -> ApiResource {
        match self {
            Self::BuildConfig => BuildConfig::api_resource(),
            Self::ServiceAccount => ServiceAccount::api_resource(),
            Self::RoleBinding => RoleBinding::api_resource(),
            Self::DeploymentConfig => DeploymentConfig::api_resource(),
            Self::Service => Service::api_resource(),
            Self::Route => Route::api_resource(),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of one compiled resource
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResourceRef<'a> {
    /// A build stage
    BuildConfig(&'a BuildConfig),
    /// The service account
    ServiceAccount(&'a ServiceAccount),
    /// The role binding
    RoleBinding(&'a RoleBinding),
    /// The deployment
    DeploymentConfig(&'a DeploymentConfig),
    /// The service
    Service(&'a Service),
    /// The route
    Route(&'a Route),
}

impl ResourceRef<'_> {
    /// Kind of the referenced resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::BuildConfig(_) => ResourceKind::BuildConfig,
            Self::ServiceAccount(_) => ResourceKind::ServiceAccount,
            Self::RoleBinding(_) => ResourceKind::RoleBinding,
            Self::DeploymentConfig(_) => ResourceKind::DeploymentConfig,
            Self::Service(_) => ResourceKind::Service,
            Self::Route(_) => ResourceKind::Route,
        }
    }

    /// Metadata of the referenced resource
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::BuildConfig(r) => &r.metadata,
            Self::ServiceAccount(r) => &r.metadata,
            Self::RoleBinding(r) => &r.metadata,
            Self::DeploymentConfig(r) => &r.metadata,
            Self::Service(r) => &r.metadata,
            Self::Route(r) => &r.metadata,
        }
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Render the resource as a JSON manifest
    pub fn to_manifest(&self) -> Result<serde_json::Value, Error> {
        fn render<T: Serialize>(resource: &T) -> Result<serde_json::Value, Error> {
            Ok(serde_json::to_value(resource)?)
        }
        match self {
            Self::BuildConfig(r) => render(r),
            Self::ServiceAccount(r) => render(r),
            Self::RoleBinding(r) => render(r),
            Self::DeploymentConfig(r) => render(r),
            Self::Service(r) => render(r),
            Self::Route(r) => render(r),
        }
    }
}

// =============================================================================
// Compiled output
// =============================================================================

/// Every resource compiled for one KogitoApp
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledKogitoApp {
    /// S2I build stage
    pub build_s2i: BuildConfig,
    /// Runner build stage
    pub build_runner: BuildConfig,
    /// Service account the workload runs as
    pub service_account: ServiceAccount,
    /// Binding of the default role to the service account
    pub role_binding: RoleBinding,
    /// The workload
    pub deployment_config: DeploymentConfig,
    /// Cluster-internal service
    pub service: Service,
    /// External route
    pub route: Route,
}

impl CompiledKogitoApp {
    /// All resources in creation order
    pub fn resources(&self) -> Vec<ResourceRef<'_>> {
        vec![
            ResourceRef::BuildConfig(&self.build_s2i),
            ResourceRef::BuildConfig(&self.build_runner),
            ResourceRef::ServiceAccount(&self.service_account),
            ResourceRef::RoleBinding(&self.role_binding),
            ResourceRef::DeploymentConfig(&self.deployment_config),
            ResourceRef::Service(&self.service),
            ResourceRef::Route(&self.route),
        ]
    }

    /// Resources grouped by kind; BuildConfig lists S2I before runner
    pub fn by_kind(&self) -> BTreeMap<ResourceKind, Vec<ResourceRef<'_>>> {
        let mut grouped: BTreeMap<ResourceKind, Vec<ResourceRef<'_>>> = BTreeMap::new();
        for resource in self.resources() {
            grouped.entry(resource.kind()).or_default().push(resource);
        }
        grouped
    }

    /// Total count of compiled resources
    pub fn resource_count(&self) -> usize {
        self.resources().len()
    }

    /// Render every resource as a JSON manifest, in creation order
    pub fn to_manifests(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.resources().iter().map(ResourceRef::to_manifest).collect()
    }
}

// =============================================================================
// KogitoApp Compiler
// =============================================================================

/// Compiles a KogitoApp into its full set of cluster resources
pub struct KogitoAppCompiler<'a> {
    images: &'a BaseImageTable,
}

impl<'a> KogitoAppCompiler<'a> {
    /// Create a compiler over a base image table
    pub fn new(images: &'a BaseImageTable) -> Self {
        Self { images }
    }

    /// Compile a KogitoApp.
    ///
    /// `image` is the runner image's metadata when the reconciler has
    /// already inspected it; without it the deployment exposes no ports and
    /// the service step fails.
    pub fn compile(
        &self,
        app: &KogitoApp,
        image: Option<&DockerImage>,
    ) -> Result<CompiledKogitoApp, Error> {
        app.validate()?;
        let app_name = app.app_name()?;
        let namespace = app.target_namespace()?;
        let _span = info_span!("compile", app = app_name, namespace).entered();

        let builds = BuildCompiler::new(self.images);
        let build_s2i = builds.compile_s2i(app)?;
        let build_runner = builds.compile_runner(app, Some(&build_s2i))?;

        let service_account = IdentityCompiler::compile_service_account(app)?;
        let role_binding = IdentityCompiler::compile_role_binding(app_name, &service_account);

        let deployment_config =
            WorkloadCompiler::compile(app, Some(&build_runner), Some(&service_account), image)?;
        let service = NetworkCompiler::compile_service(app_name, &deployment_config)?;
        let route = NetworkCompiler::compile_route(app_name, Some(&service))?;

        debug!(app = app_name, "compiled all resources");
        Ok(CompiledKogitoApp {
            build_s2i,
            build_runner,
            service_account,
            role_binding,
            deployment_config,
            service,
            route,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
