//! Error types for resource composition
//!
//! Every builder returns one of these instead of a half-populated definition.
//! The composer surfaces the first one it meets and stops.

use thiserror::Error;

use crate::build::BuildType;
use crate::crd::RuntimeType;

/// Main error type for KogitoApp resource composition
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required predecessor resource is absent
    #[error("cannot build {resource}: missing {dependency}")]
    MissingDependency {
        /// The resource being built (e.g. "DeploymentConfig example")
        resource: String,
        /// What it needed but did not get
        dependency: String,
    },

    /// No base image registered for a build stage and runtime
    #[error("no {build_type} base image registered for runtime {runtime}")]
    ImageLookup {
        /// Build stage that asked for the image
        build_type: BuildType,
        /// Runtime that has no entry
        runtime: RuntimeType,
    },

    /// The KogitoApp specification itself is malformed
    #[error("validation error: {0}")]
    Validation(String),

    /// The base image table could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// A composed definition could not be rendered
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a missing dependency error
    pub fn missing_dependency(resource: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            resource: resource.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True when the error is a missing predecessor resource
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Story: Errors name what went wrong
    // ==========================================================================

    #[test]
    fn story_missing_dependency_names_both_sides() {
        let err = Error::missing_dependency("DeploymentConfig example", "ServiceAccount");
        let msg = err.to_string();
        assert!(msg.contains("DeploymentConfig example"));
        assert!(msg.contains("missing ServiceAccount"));
        assert!(err.is_missing_dependency());
    }

    #[test]
    fn story_image_lookup_names_stage_and_runtime() {
        let err = Error::ImageLookup {
            build_type: BuildType::Runner,
            runtime: RuntimeType::Springboot,
        };
        assert_eq!(
            err.to_string(),
            "no runner base image registered for runtime springboot"
        );
        assert!(!err.is_missing_dependency());
    }

    #[test]
    fn story_error_construction_ergonomics() {
        let err = Error::validation(format!("KogitoApp {} has no namespace", "orders"));
        assert!(err.to_string().contains("orders"));

        match Error::config("bad table") {
            Error::Config(msg) => assert_eq!(msg, "bad table"),
            other => panic!("expected Config variant, got {other:?}"),
        }
    }

    #[test]
    fn story_json_errors_become_serialization_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
