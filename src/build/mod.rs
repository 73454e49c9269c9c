//! Build definitions for a Kogito service
//!
//! A service is built in two chained stages:
//! - S2I: compiles the git sources into an artifact image (`<name>-builder:latest`)
//! - Runner: copies the artifact out of the S2I image into a slim runtime
//!   image (`<name>:latest`) and rebuilds whenever the S2I output changes
//!
//! The runner can only be composed from a fully formed S2I definition.

mod images;

pub use images::{BaseImage, BaseImageTable, DEFAULT_IMAGE_NAMESPACE, DEFAULT_IMAGE_TAG};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crd::KogitoApp;
use crate::meta::stamp;
use crate::resources::{env_vars, EnvVar, HasApiResource, ObjectMeta, ObjectReference};
use crate::Error;

/// Suffix appended to the application name for the S2I stage
pub const S2I_NAME_SUFFIX: &str = "-builder";

/// Tag every build stage pushes to
pub const TAG_LATEST: &str = "latest";

/// Path inside the S2I image holding the built artifacts
pub const RUNNER_SOURCE_PATH: &str = "/home/kogito/bin";

/// Where the runner build drops the copied artifacts
pub const RUNNER_DESTINATION_DIR: &str = ".";

// =============================================================================
// Build stage keys
// =============================================================================

/// Which build stage a definition or base image belongs to
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Source-to-image compile stage
    S2i,
    /// Runtime repackaging stage
    Runner,
}

impl BuildType {
    /// Both stages, in build order
    pub const ALL: [BuildType; 2] = [BuildType::S2i, BuildType::Runner];
}

impl std::str::FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s2i" => Ok(Self::S2i),
            "runner" => Ok(Self::Runner),
            _ => Err(Error::config(format!(
                "invalid build type: {s}, expected one of: s2i, runner"
            ))),
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S2i => write!(f, "s2i"),
            Self::Runner => write!(f, "runner"),
        }
    }
}

// =============================================================================
// BuildConfig
// =============================================================================

/// OpenShift BuildConfig
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: BuildConfigSpec,
}

impl HasApiResource for BuildConfig {
    const API_VERSION: &'static str = "build.openshift.io/v1";
    const KIND: &'static str = "BuildConfig";
}

impl BuildConfig {
    /// Image reference this build pushes to
    pub fn output_image(&self) -> &ObjectReference {
        &self.spec.output.to
    }
}

/// BuildConfig spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigSpec {
    /// Where the build input comes from
    pub source: BuildSource,
    /// How the build runs
    pub strategy: BuildStrategy,
    /// Where the built image goes
    pub output: BuildOutput,
    /// What re-triggers the build
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<BuildTriggerPolicy>,
}

/// Build input
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildSource {
    /// Source type: Git or Image
    #[serde(rename = "type")]
    pub type_: String,
    /// Git repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitBuildSource>,
    /// Subdirectory of the repository to build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_dir: Option<String>,
    /// Images to copy content from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageSource>,
}

/// Git build input
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitBuildSource {
    /// Repository URI
    pub uri: String,
    /// Branch, tag or commit
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
}

/// Image build input
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    /// Image to copy from
    pub from: ObjectReference,
    /// Paths to copy
    pub paths: Vec<ImageSourcePath>,
}

/// One path copied out of a source image
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSourcePath {
    /// Path inside the source image
    pub source_path: String,
    /// Directory in the build context
    pub destination_dir: String,
}

/// Build strategy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategy {
    /// Strategy type (always Source)
    #[serde(rename = "type")]
    pub type_: String,
    /// Source strategy settings
    pub source_strategy: SourceBuildStrategy,
}

/// Source strategy settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceBuildStrategy {
    /// Base builder image
    pub from: ObjectReference,
    /// Build-time environment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    /// Incremental build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental: Option<bool>,
}

/// Build output
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    /// Output image reference
    pub to: ObjectReference,
}

/// Build trigger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildTriggerPolicy {
    /// Trigger type
    #[serde(rename = "type")]
    pub type_: String,
    /// Image change trigger settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_change: Option<ImageChangeTrigger>,
}

/// Rebuild when an image changes
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageChangeTrigger {
    /// Watched image
    pub from: ObjectReference,
}

// =============================================================================
// Build Compiler
// =============================================================================

/// Composes the S2I and runner BuildConfigs for a KogitoApp
pub struct BuildCompiler<'a> {
    images: &'a BaseImageTable,
}

impl<'a> BuildCompiler<'a> {
    /// Create a build compiler over a base image table
    pub fn new(images: &'a BaseImageTable) -> Self {
        Self { images }
    }

    /// Compose the S2I stage that builds the git sources
    pub fn compile_s2i(&self, app: &KogitoApp) -> Result<BuildConfig, Error> {
        let app_name = app.app_name()?;
        let namespace = app.target_namespace()?;
        let base = self.images.lookup(BuildType::S2i, app.spec.runtime)?;
        let build = &app.spec.build;

        let name = format!("{app_name}{S2I_NAME_SUFFIX}");
        let output = ObjectReference::image_stream_tag(format!("{name}:{TAG_LATEST}"));

        let build_config = BuildConfig {
            api_version: BuildConfig::API_VERSION.to_string(),
            kind: BuildConfig::KIND.to_string(),
            metadata: stamp(ObjectMeta::new(name, namespace), app_name),
            spec: BuildConfigSpec {
                source: BuildSource {
                    type_: "Git".to_string(),
                    git: Some(GitBuildSource {
                        uri: build.git_source.uri.clone(),
                        ref_: build.git_source.reference.clone(),
                    }),
                    context_dir: build.git_source.context_dir.clone(),
                    images: vec![],
                },
                strategy: BuildStrategy {
                    type_: "Source".to_string(),
                    source_strategy: SourceBuildStrategy {
                        from: base.reference(),
                        env: env_vars(&build.env),
                        incremental: Some(build.incremental),
                    },
                },
                output: BuildOutput { to: output },
                triggers: vec![],
            },
        };

        debug!(app = app_name, build = %build_config.metadata.name, "composed S2I build");
        Ok(build_config)
    }

    /// Compose the runner stage on top of a composed S2I stage
    pub fn compile_runner(
        &self,
        app: &KogitoApp,
        s2i: Option<&BuildConfig>,
    ) -> Result<BuildConfig, Error> {
        let app_name = app.app_name()?;
        let namespace = app.target_namespace()?;
        let resource = format!("runner BuildConfig {app_name}");

        let s2i = s2i.ok_or_else(|| Error::missing_dependency(&resource, "S2I build definition"))?;
        let s2i_output = s2i.output_image();
        if s2i_output.name.is_empty() {
            return Err(Error::missing_dependency(
                &resource,
                format!("output image of S2I build {}", s2i.metadata.name),
            ));
        }

        let base = self.images.lookup(BuildType::Runner, app.spec.runtime)?;
        let output = ObjectReference::image_stream_tag(format!("{app_name}:{TAG_LATEST}"));

        let build_config = BuildConfig {
            api_version: BuildConfig::API_VERSION.to_string(),
            kind: BuildConfig::KIND.to_string(),
            metadata: stamp(ObjectMeta::new(app_name, namespace), app_name),
            spec: BuildConfigSpec {
                source: BuildSource {
                    type_: "Image".to_string(),
                    git: None,
                    context_dir: None,
                    images: vec![ImageSource {
                        from: s2i_output.clone(),
                        paths: vec![ImageSourcePath {
                            source_path: RUNNER_SOURCE_PATH.to_string(),
                            destination_dir: RUNNER_DESTINATION_DIR.to_string(),
                        }],
                    }],
                },
                strategy: BuildStrategy {
                    type_: "Source".to_string(),
                    source_strategy: SourceBuildStrategy {
                        from: base.reference(),
                        env: vec![],
                        incremental: None,
                    },
                },
                output: BuildOutput { to: output },
                triggers: vec![BuildTriggerPolicy {
                    type_: "ImageChange".to_string(),
                    image_change: Some(ImageChangeTrigger {
                        from: s2i_output.clone(),
                    }),
                }],
            },
        };

        debug!(
            app = app_name,
            build = %build_config.metadata.name,
            from = %s2i_output.name,
            "composed runner build"
        );
        Ok(build_config)
    }
}

// =============================================================================
// Tests
// =============================================================================
