//! Supporting types for the KogitoApp CRD

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Runtime platform a Kogito service is built on
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    /// Quarkus runtime
    #[default]
    Quarkus,
    /// Spring Boot runtime
    Springboot,
}

impl RuntimeType {
    /// All supported runtimes
    pub const ALL: [RuntimeType; 2] = [RuntimeType::Quarkus, RuntimeType::Springboot];
}

impl std::str::FromStr for RuntimeType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quarkus" => Ok(Self::Quarkus),
            "springboot" => Ok(Self::Springboot),
            _ => Err(crate::Error::validation(format!(
                "invalid runtime type: {s}, expected one of: quarkus, springboot"
            ))),
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quarkus => write!(f, "quarkus"),
            Self::Springboot => write!(f, "springboot"),
        }
    }
}

/// Git repository the S2I build pulls from
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitSource {
    /// Repository URI
    pub uri: String,

    /// Subdirectory holding the service sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_dir: Option<String>,

    /// Branch, tag or commit to build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Build configuration for the S2I stage
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    /// Where the sources live
    pub git_source: GitSource,

    /// Build-time environment variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVarSpec>,

    /// Reuse artifacts from the previous build
    #[serde(default)]
    pub incremental: bool,
}

/// A single name/value environment variable
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct EnvVarSpec {
    /// Variable name
    pub name: String,
    /// Variable value
    #[serde(default)]
    pub value: String,
}

impl EnvVarSpec {
    /// Create a new environment variable
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// CPU and memory quantities
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ResourceQuantitySpec {
    /// CPU quantity (e.g. "500m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory quantity (e.g. "512Mi")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl ResourceQuantitySpec {
    fn is_empty(&self) -> bool {
        self.cpu.is_none() && self.memory.is_none()
    }
}

/// Resource requests and limits for the service container
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ResourcesSpec {
    /// Minimum resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceQuantitySpec>,
    /// Maximum resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceQuantitySpec>,
}

impl ResourcesSpec {
    /// True when neither requests nor limits carry a quantity
    pub fn is_empty(&self) -> bool {
        self.requests.as_ref().is_none_or(ResourceQuantitySpec::is_empty)
            && self.limits.as_ref().is_none_or(ResourceQuantitySpec::is_empty)
    }
}
