//! Default labels and annotations for composed resources
//!
//! Every definition leaving the composer is stamped: the managed-by
//! annotations are merged in and the `app` label is set to the application
//! name. Stamping consumes the metadata and hands back the merged value, so
//! applying it twice is the same as applying it once.

use std::collections::BTreeMap;

use crate::resources::ObjectMeta;

/// Label identifying the application a resource belongs to
pub const LABEL_APP_NAME: &str = "app";

/// Annotation naming the operator that manages the resource
pub const ANNOTATION_MANAGED_BY: &str = "org.kie.kogito/managed-by";

/// Annotation naming the CRD the resource was composed from
pub const ANNOTATION_OPERATOR_CRD: &str = "org.kie.kogito/operator-crd";

/// Annotations stamped on every composed resource
pub const DEFAULT_ANNOTATIONS: [(&str, &str); 2] = [
    (ANNOTATION_MANAGED_BY, "Kogito Operator"),
    (ANNOTATION_OPERATOR_CRD, "KogitoApp"),
];

/// Metadata that carries labels and annotations
pub trait Stamp: Sized {
    /// Mutable access to the label and annotation maps
    fn label_maps_mut(
        &mut self,
    ) -> (
        &mut BTreeMap<String, String>,
        &mut BTreeMap<String, String>,
    );

    /// Merge the default annotations and set the `app` label.
    ///
    /// Annotations the caller already set under other keys survive. The
    /// `app` label is always overwritten with `app_name`.
    fn stamped(mut self, app_name: &str) -> Self {
        let (labels, annotations) = self.label_maps_mut();
        for (key, value) in DEFAULT_ANNOTATIONS {
            annotations.insert(key.to_string(), value.to_string());
        }
        labels.insert(LABEL_APP_NAME.to_string(), app_name.to_string());
        self
    }
}

impl Stamp for ObjectMeta {
    fn label_maps_mut(
        &mut self,
    ) -> (
        &mut BTreeMap<String, String>,
        &mut BTreeMap<String, String>,
    ) {
        (&mut self.labels, &mut self.annotations)
    }
}

/// Stamp metadata with the default annotations and `app` label
pub fn stamp<M: Stamp>(metadata: M, app_name: &str) -> M {
    metadata.stamped(app_name)
}

/// Selector labels matching every stamped resource of an application
pub fn default_labels(app_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(LABEL_APP_NAME.to_string(), app_name.to_string())])
}
