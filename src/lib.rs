//! Kogito Operator - resource composition for KogitoApp
//!
//! Turns one `KogitoApp` custom resource into the seven OpenShift and
//! Kubernetes resources that build, run and expose a Kogito service.
//!
//! # Composition
//!
//! Resources are composed in dependency order, each step handed its
//! predecessors explicitly:
//!
//! 1. S2I BuildConfig (source to binary)
//! 2. Runner BuildConfig (binary to runtime image)
//! 3. ServiceAccount and its RoleBinding
//! 4. DeploymentConfig, shaped by the runner image's labels
//! 5. Service, then Route
//!
//! # Modules
//!
//! - [`crd`] - KogitoApp Custom Resource Definition
//! - [`build`] - S2I and runner BuildConfigs, base image table
//! - [`identity`] - ServiceAccount and RoleBinding
//! - [`workload`] - DeploymentConfig and image label parsing
//! - [`network`] - Service and Route
//! - [`compiler`] - Orchestrates the full composition
//! - [`meta`] - Default labels and annotations
//! - [`resources`] - Shared wire types
//! - [`image`] - Container image metadata
//! - [`telemetry`] - Structured logging setup
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod build;
pub mod compiler;
pub mod crd;
pub mod error;
pub mod identity;
pub mod image;
pub mod meta;
pub mod network;
pub mod resources;
pub mod telemetry;
pub mod workload;

pub use compiler::{CompiledKogitoApp, KogitoAppCompiler, ResourceKind, ResourceRef};
pub use crd::{KogitoApp, KogitoAppSpec, RuntimeType};
pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Shared Constants
// =============================================================================

/// Kind of the image references exchanged between builds and deployments
pub const IMAGE_STREAM_TAG_KIND: &str = "ImageStreamTag";
