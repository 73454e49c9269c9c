//! Base image table for build stages
//!
//! Each build stage starts from a base builder image chosen by
//! `(BuildType, RuntimeType)`. The table is the only configuration the
//! composer reads. It is built once by the embedding application and only
//! borrowed afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use yaml_rust2::{Yaml, YamlLoader};

use super::BuildType;
use crate::crd::RuntimeType;
use crate::resources::ObjectReference;
use crate::Error;

/// Namespace the default base ImageStreams live in
pub const DEFAULT_IMAGE_NAMESPACE: &str = "openshift";

/// Tag of the default base ImageStreams
pub const DEFAULT_IMAGE_TAG: &str = "0.2.0";

fn default_namespace() -> String {
    DEFAULT_IMAGE_NAMESPACE.to_string()
}

fn default_tag() -> String {
    DEFAULT_IMAGE_TAG.to_string()
}

/// A base ImageStream a build stage starts from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaseImage {
    /// ImageStream name
    pub name: String,
    /// Namespace holding the ImageStream
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// ImageStream tag
    #[serde(default = "default_tag")]
    pub tag: String,
}

impl BaseImage {
    /// Base image in the default namespace with the default tag
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: default_namespace(),
            tag: default_tag(),
        }
    }

    /// `name:tag`
    pub fn image_stream_tag(&self) -> String {
        format!("{}:{}", self.name, self.tag)
    }

    /// ImageStreamTag reference usable as a build strategy's `from`
    pub fn reference(&self) -> ObjectReference {
        ObjectReference::image_stream_tag(self.image_stream_tag()).in_namespace(&self.namespace)
    }
}

/// Lookup of base images keyed by build stage and runtime
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseImageTable {
    images: BTreeMap<(BuildType, RuntimeType), BaseImage>,
}

impl Default for BaseImageTable {
    fn default() -> Self {
        Self::empty()
            .with_image(
                BuildType::S2i,
                RuntimeType::Quarkus,
                BaseImage::new("kogito-quarkus-centos-s2i"),
            )
            .with_image(
                BuildType::S2i,
                RuntimeType::Springboot,
                BaseImage::new("kogito-springboot-centos-s2i"),
            )
            .with_image(
                BuildType::Runner,
                RuntimeType::Quarkus,
                BaseImage::new("kogito-quarkus-centos"),
            )
            .with_image(
                BuildType::Runner,
                RuntimeType::Springboot,
                BaseImage::new("kogito-springboot-centos"),
            )
    }
}

impl BaseImageTable {
    /// A table with no entries
    pub fn empty() -> Self {
        Self {
            images: BTreeMap::new(),
        }
    }

    /// Register (or replace) the image for a stage and runtime
    pub fn with_image(mut self, build_type: BuildType, runtime: RuntimeType, image: BaseImage) -> Self {
        self.images.insert((build_type, runtime), image);
        self
    }

    /// Find the base image for a stage and runtime
    pub fn lookup(&self, build_type: BuildType, runtime: RuntimeType) -> Result<&BaseImage, Error> {
        self.images
            .get(&(build_type, runtime))
            .ok_or(Error::ImageLookup {
                build_type,
                runtime,
            })
    }

    /// Number of registered images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True when no image is registered
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Load a table from YAML.
    ///
    /// ```yaml
    /// s2i:
    ///   quarkus: { name: kogito-quarkus-centos-s2i, tag: "0.3.0" }
    /// runner:
    ///   quarkus: { name: kogito-quarkus-centos, namespace: images }
    /// ```
    ///
    /// Only the listed entries are registered. An empty document yields an
    /// empty table.
    pub fn from_yaml(input: &str) -> Result<Self, Error> {
        let docs = YamlLoader::load_from_str(input)
            .map_err(|e| Error::config(format!("invalid base image YAML: {e}")))?;
        let Some(doc) = docs.into_iter().next() else {
            return Ok(Self::empty());
        };
        let value = yaml_to_json(doc)?;
        if value.is_null() {
            return Ok(Self::empty());
        }

        let raw: BTreeMap<String, BTreeMap<String, BaseImage>> = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("invalid base image table: {e}")))?;

        let mut table = Self::empty();
        for (build_type, runtimes) in raw {
            let build_type: BuildType = build_type.parse()?;
            for (runtime, image) in runtimes {
                let runtime: RuntimeType = runtime
                    .parse()
                    .map_err(|e: Error| Error::config(e.to_string()))?;
                table = table.with_image(build_type, runtime, image);
            }
        }
        Ok(table)
    }
}

/// Convert a YAML node to JSON. Scalars are read as strings since the
/// table holds only names, namespaces and tags (`tag: 0.2` stays "0.2").
fn yaml_to_json(yaml: Yaml) -> Result<Value, Error> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::String(s) | Yaml::Real(s) => Ok(Value::String(s)),
        Yaml::Integer(i) => Ok(Value::String(i.to_string())),
        Yaml::Boolean(b) => Ok(Value::String(b.to_string())),
        Yaml::Array(items) => items
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Hash(map) => map
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    Yaml::String(s) | Yaml::Real(s) => s,
                    Yaml::Integer(i) => i.to_string(),
                    _ => return Err(Error::config("base image table keys must be scalars")),
                };
                yaml_to_json(v).map(|v| (key, v))
            })
            .collect::<Result<Map<String, Value>, _>>()
            .map(Value::Object),
        _ => Err(Error::config("unsupported YAML node in base image table")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Story: The default table covers every stage and runtime
    // =========================================================================

    #[test]
    fn story_default_table_is_complete() {
        let table = BaseImageTable::default();
        assert_eq!(table.len(), 4);
        for build_type in BuildType::ALL {
            for runtime in RuntimeType::ALL {
                let image = table.lookup(build_type, runtime).unwrap();
                assert_eq!(image.namespace, "openshift");
                assert_eq!(image.tag, "0.2.0");
            }
        }
        assert_eq!(
            table
                .lookup(BuildType::S2i, RuntimeType::Quarkus)
                .unwrap()
                .name,
            "kogito-quarkus-centos-s2i"
        );
        assert_eq!(
            table
                .lookup(BuildType::Runner, RuntimeType::Springboot)
                .unwrap()
                .name,
            "kogito-springboot-centos"
        );
    }

    #[test]
    fn story_lookup_miss_is_an_error() {
        let table = BaseImageTable::empty().with_image(
            BuildType::S2i,
            RuntimeType::Quarkus,
            BaseImage::new("only-one"),
        );
        let err = table
            .lookup(BuildType::Runner, RuntimeType::Quarkus)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ImageLookup {
                build_type: BuildType::Runner,
                runtime: RuntimeType::Quarkus
            }
        ));
    }

    #[test]
    fn story_base_image_reference_points_at_its_namespace() {
        let reference = BaseImage::new("kogito-quarkus-centos").reference();
        assert_eq!(reference.kind, "ImageStreamTag");
        assert_eq!(reference.name, "kogito-quarkus-centos:0.2.0");
        assert_eq!(reference.namespace.as_deref(), Some("openshift"));
    }

    // =========================================================================
    // Story: Embedding applications load their own table
    // =========================================================================

    #[test]
    fn story_table_from_yaml() {
        let yaml = r#"
s2i:
  quarkus:
    name: custom-s2i
    tag: 0.3
runner:
  Quarkus:
    name: custom-runner
    namespace: images
"#;
        let table = BaseImageTable::from_yaml(yaml).unwrap();
        assert_eq!(table.len(), 2);

        let s2i = table.lookup(BuildType::S2i, RuntimeType::Quarkus).unwrap();
        assert_eq!(s2i.name, "custom-s2i");
        assert_eq!(s2i.tag, "0.3");
        assert_eq!(s2i.namespace, "openshift");

        let runner = table
            .lookup(BuildType::Runner, RuntimeType::Quarkus)
            .unwrap();
        assert_eq!(runner.namespace, "images");
        assert_eq!(runner.tag, "0.2.0");

        assert!(table
            .lookup(BuildType::S2i, RuntimeType::Springboot)
            .is_err());
    }

    #[test]
    fn story_yaml_with_unknown_keys_is_rejected() {
        let err = BaseImageTable::from_yaml("native:\n  quarkus:\n    name: x\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = BaseImageTable::from_yaml("s2i:\n  node:\n    name: x\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = BaseImageTable::from_yaml("s2i:\n  quarkus:\n    tag: x\n").unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn story_empty_yaml_is_an_empty_table() {
        assert!(BaseImageTable::from_yaml("").unwrap().is_empty());
        assert!(BaseImageTable::from_yaml("~").unwrap().is_empty());
    }
}
