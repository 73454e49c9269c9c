//! Identity for the deployed service
//!
//! Every Kogito service runs as the well-known `kogito-service` account,
//! bound read-only to its namespace through the `view` role.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crd::KogitoApp;
use crate::meta::stamp;
use crate::resources::{HasApiResource, ObjectMeta};
use crate::Error;

/// Name of the service account Kogito services run as
pub const SERVICE_ACCOUNT_NAME: &str = "kogito-service";

/// Role granted to the service account
pub const DEFAULT_ROLE_NAME: &str = "view";

/// Kind of the granted role
pub const DEFAULT_ROLE_KIND: &str = "Role";

const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

// =============================================================================
// ServiceAccount
// =============================================================================

/// Kubernetes ServiceAccount
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
}

impl HasApiResource for ServiceAccount {
    const API_VERSION: &'static str = "v1";
    const KIND: &'static str = "ServiceAccount";
}

// =============================================================================
// RoleBinding
// =============================================================================

/// Kubernetes RoleBinding
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Role being granted
    pub role_ref: RoleRef,
    /// Who receives the role
    pub subjects: Vec<Subject>,
}

impl HasApiResource for RoleBinding {
    const API_VERSION: &'static str = "rbac.authorization.k8s.io/v1";
    const KIND: &'static str = "RoleBinding";
}

/// Reference to the granted role
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    /// API group of the role
    pub api_group: String,
    /// Role or ClusterRole
    pub kind: String,
    /// Role name
    pub name: String,
}

/// Binding subject
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Subject kind
    pub kind: String,
    /// Subject name
    pub name: String,
    /// Subject namespace
    pub namespace: String,
}

// =============================================================================
// Identity Compiler
// =============================================================================

/// Composes the service account and its role binding
pub struct IdentityCompiler;

impl IdentityCompiler {
    /// Compose the service account the workload runs as
    pub fn compile_service_account(app: &KogitoApp) -> Result<ServiceAccount, Error> {
        let app_name = app.app_name()?;
        let namespace = app.target_namespace()?;

        debug!(app = app_name, account = SERVICE_ACCOUNT_NAME, "composed service account");
        Ok(ServiceAccount {
            api_version: ServiceAccount::API_VERSION.to_string(),
            kind: ServiceAccount::KIND.to_string(),
            metadata: stamp(ObjectMeta::new(SERVICE_ACCOUNT_NAME, namespace), app_name),
        })
    }

    /// Bind the default role to an already composed service account.
    ///
    /// Infallible: the composer only calls this once the account exists.
    pub fn compile_role_binding(app_name: &str, service_account: &ServiceAccount) -> RoleBinding {
        let account = &service_account.metadata;
        let name = format!("{}-{}", SERVICE_ACCOUNT_NAME, DEFAULT_ROLE_NAME);

        RoleBinding {
            api_version: RoleBinding::API_VERSION.to_string(),
            kind: RoleBinding::KIND.to_string(),
            metadata: stamp(ObjectMeta::new(name, account.namespace.clone()), app_name),
            role_ref: RoleRef {
                api_group: RBAC_API_GROUP.to_string(),
                kind: DEFAULT_ROLE_KIND.to_string(),
                name: DEFAULT_ROLE_NAME.to_string(),
            },
            subjects: vec![Subject {
                kind: ServiceAccount::KIND.to_string(),
                name: account.name.clone(),
                namespace: account.namespace.clone(),
            }],
        }
    }
}
