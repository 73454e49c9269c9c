//! Custom Resource Definitions for the Kogito operator
//!
//! This module contains the KogitoApp CRD consumed by the resource composer.

mod app;
mod types;

pub use app::{KogitoApp, KogitoAppSpec};
pub use types::{
    BuildSpec, EnvVarSpec, GitSource, ResourceQuantitySpec, ResourcesSpec, RuntimeType,
};
