//! Image metadata from an inspected container image
//!
//! The composer never inspects images itself. A collaborator pulls the
//! runner build's output image and hands over its Docker metadata; only the
//! label map is read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Docker image metadata, in the Docker API's PascalCase shape
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DockerImage {
    /// Image identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Runtime configuration baked into the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DockerConfig>,
}

/// Runtime configuration of an image
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DockerConfig {
    /// Image labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl DockerImage {
    /// Build image metadata carrying only the given labels
    pub fn with_labels<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id: None,
            config: Some(DockerConfig {
                labels: Some(
                    labels
                        .into_iter()
                        .map(|(k, v)| (k.into(), v.into()))
                        .collect(),
                ),
            }),
        }
    }

    /// Image labels, if the image declares any
    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.config.as_ref().and_then(|c| c.labels.as_ref())
    }
}
