//! Workload definition for a Kogito service
//!
//! The service runs as a single-container DeploymentConfig whose image is the
//! runner build's output. What the container exposes is not part of the
//! KogitoApp: it is read from labels on the built image.
//! - `org.kie/<key>=<value>` labels are promoted to `<key>=<value>` on the
//!   deployment, its selector and its pod template
//! - `io.openshift.expose-services=8080:http,9000:grpc` becomes container
//!   ports, and an `http` entry also yields TCP liveness/readiness probes
//!
//! An image without those labels gives an unexposed but valid deployment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::build::BuildConfig;
use crate::crd::{KogitoApp, ResourceQuantitySpec, ResourcesSpec};
use crate::identity::ServiceAccount;
use crate::image::DockerImage;
use crate::meta::{default_labels, stamp, Stamp};
use crate::resources::{env_vars, EnvVar, HasApiResource, ObjectMeta, ObjectReference};
use crate::Error;

/// Replica count used when the KogitoApp does not set one
pub const DEFAULT_REPLICAS: u32 = 1;

/// Image label namespace whose keys are promoted onto the deployment
pub const ORG_KIE_LABEL_PREFIX: &str = "org.kie/";

/// Image label listing the services the image exposes
pub const LABEL_EXPOSE_SERVICES: &str = "io.openshift.expose-services";

/// Separator between exposed service entries
pub const EXPOSED_SERVICES_SEPARATOR: char = ',';

/// Separator between port number and port name in an entry
pub const PORT_SEPARATOR: char = ':';

/// Port name that gets health probes attached
pub const DEFAULT_EXPOSED_PROTOCOL: &str = "http";

/// Transport protocol of every discovered port
pub const PROTOCOL_TCP: &str = "TCP";

const PULL_ALWAYS: &str = "Always";

// =============================================================================
// DeploymentConfig
// =============================================================================

/// OpenShift DeploymentConfig
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: DeploymentConfigSpec,
}

impl HasApiResource for DeploymentConfig {
    const API_VERSION: &'static str = "apps.openshift.io/v1";
    const KIND: &'static str = "DeploymentConfig";
}

impl DeploymentConfig {
    /// The first (and only) container, if any
    pub fn main_container(&self) -> Option<&Container> {
        self.spec.template.spec.containers.first()
    }
}

/// DeploymentConfig spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    /// Number of replicas
    pub replicas: u32,
    /// Pod selector
    pub selector: BTreeMap<String, String>,
    /// Pod template
    pub template: PodTemplateSpec,
    /// Rollout strategy
    pub strategy: DeploymentStrategy,
    /// What triggers a rollout
    pub triggers: Vec<DeploymentTriggerPolicy>,
}

/// Rollout strategy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStrategy {
    /// Strategy type: Rolling or Recreate
    #[serde(rename = "type")]
    pub type_: String,
}

/// Rollout trigger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerPolicy {
    /// Trigger type: ConfigChange or ImageChange
    #[serde(rename = "type")]
    pub type_: String,
    /// Image change settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_change_params: Option<DeploymentTriggerImageChangeParams>,
}

/// Roll out when an image changes
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerImageChangeParams {
    /// Roll out without manual approval
    pub automatic: bool,
    /// Containers whose image is replaced
    pub container_names: Vec<String>,
    /// Watched image
    pub from: ObjectReference,
}

/// Pod template spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplateSpec {
    /// Pod metadata
    pub metadata: PodMeta,
    /// Pod spec
    pub spec: PodSpec,
}

/// Pod metadata (subset of ObjectMeta)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodMeta {
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Stamp for PodMeta {
    fn label_maps_mut(
        &mut self,
    ) -> (
        &mut BTreeMap<String, String>,
        &mut BTreeMap<String, String>,
    ) {
        (&mut self.labels, &mut self.annotations)
    }
}

/// Pod spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Service account name
    pub service_account_name: String,
    /// Containers
    pub containers: Vec<Container>,
}

/// Container spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name
    pub name: String,
    /// Image
    pub image: String,
    /// Image pull policy
    pub image_pull_policy: String,
    /// Environment variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    /// Ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    /// Resource requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
    /// Liveness probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Readiness probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
}

/// Container port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port name
    pub name: String,
    /// Port number
    pub container_port: u16,
    /// Protocol
    pub protocol: String,
}

/// Resource requirements
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    /// Requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceQuantity>,
    /// Limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceQuantity>,
}

/// Resource quantity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuantity {
    /// CPU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl From<&ResourceQuantitySpec> for ResourceQuantity {
    fn from(spec: &ResourceQuantitySpec) -> Self {
        Self {
            cpu: spec.cpu.clone(),
            memory: spec.memory.clone(),
        }
    }
}

impl From<&ResourcesSpec> for ResourceRequirements {
    fn from(spec: &ResourcesSpec) -> Self {
        Self {
            requests: spec.requests.as_ref().map(ResourceQuantity::from),
            limits: spec.limits.as_ref().map(ResourceQuantity::from),
        }
    }
}

/// Health probe
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    /// TCP socket check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_socket: Option<TcpSocketAction>,
    /// Seconds before the check times out
    pub timeout_seconds: u32,
    /// Seconds between checks
    pub period_seconds: u32,
    /// Consecutive successes to be considered healthy
    pub success_threshold: u32,
    /// Consecutive failures to be considered unhealthy
    pub failure_threshold: u32,
}

impl Probe {
    /// TCP probe on `port` with the fixed Kogito thresholds
    pub fn tcp(port: u16) -> Self {
        Self {
            tcp_socket: Some(TcpSocketAction { port }),
            timeout_seconds: 1,
            period_seconds: 10,
            success_threshold: 1,
            failure_threshold: 3,
        }
    }
}

/// TCP socket check
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TcpSocketAction {
    /// Port to connect to
    pub port: u16,
}

// =============================================================================
// Image label discovery
// =============================================================================

/// Labels under `org.kie/` with the prefix stripped
pub fn promoted_labels(image_labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    image_labels
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ORG_KIE_LABEL_PREFIX)
                .filter(|suffix| !suffix.is_empty())
                .map(|suffix| (suffix.to_string(), value.clone()))
        })
        .collect()
}

/// Parse an exposed-services label value into container ports.
///
/// Entries are `PORT:NAME`. Entries with a non-numeric port or the wrong
/// number of fields are logged and skipped; the rest still count.
pub fn parse_exposed_services(value: &str) -> Vec<ContainerPort> {
    value
        .split(EXPOSED_SERVICES_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let port = parse_service_entry(entry);
            if port.is_none() {
                warn!(
                    entry,
                    label = LABEL_EXPOSE_SERVICES,
                    "exposed service in wrong format, expected PORT_NUMBER:PROTOCOL (e.g. 8080:http); skipping"
                );
            }
            port
        })
        .collect()
}

fn parse_service_entry(entry: &str) -> Option<ContainerPort> {
    let (number, name) = entry.split_once(PORT_SEPARATOR)?;
    let name = name.trim();
    if name.is_empty() || name.contains(PORT_SEPARATOR) {
        return None;
    }
    let container_port = number.trim().parse::<u16>().ok().filter(|p| *p != 0)?;
    Some(ContainerPort {
        name: name.to_string(),
        container_port,
        protocol: PROTOCOL_TCP.to_string(),
    })
}

/// Probe for the first port named after the default protocol
pub fn default_probe(ports: &[ContainerPort]) -> Option<Probe> {
    ports
        .iter()
        .find(|p| p.name == DEFAULT_EXPOSED_PROTOCOL)
        .map(|p| Probe::tcp(p.container_port))
}

// =============================================================================
// Workload Compiler
// =============================================================================

/// Composes the DeploymentConfig for a KogitoApp
pub struct WorkloadCompiler;

impl WorkloadCompiler {
    /// Compose the deployment from the runner build, the service account and
    /// (optionally) the runner image's metadata.
    ///
    /// Missing runner build or service account is an error. Missing image
    /// metadata only means no labels are promoted and no ports discovered.
    pub fn compile(
        app: &KogitoApp,
        runner: Option<&BuildConfig>,
        service_account: Option<&ServiceAccount>,
        image: Option<&DockerImage>,
    ) -> Result<DeploymentConfig, Error> {
        let app_name = app.app_name()?;
        let namespace = app.target_namespace()?;
        let resource = format!("DeploymentConfig {app_name}");

        let runner =
            runner.ok_or_else(|| Error::missing_dependency(&resource, "runner BuildConfig"))?;
        let service_account = service_account
            .ok_or_else(|| Error::missing_dependency(&resource, "ServiceAccount"))?;

        let runner_image = runner.output_image();
        let container = Container {
            name: app_name.to_string(),
            image: runner_image.name.clone(),
            image_pull_policy: PULL_ALWAYS.to_string(),
            env: env_vars(&app.spec.env),
            ports: vec![],
            resources: app
                .spec
                .resources
                .as_ref()
                .filter(|r| !r.is_empty())
                .map(ResourceRequirements::from),
            liveness_probe: None,
            readiness_probe: None,
        };

        let mut deployment = DeploymentConfig {
            api_version: DeploymentConfig::API_VERSION.to_string(),
            kind: DeploymentConfig::KIND.to_string(),
            metadata: stamp(ObjectMeta::new(app_name, namespace), app_name),
            spec: DeploymentConfigSpec {
                replicas: app.spec.replicas.unwrap_or(DEFAULT_REPLICAS),
                selector: default_labels(app_name),
                template: PodTemplateSpec {
                    metadata: stamp(PodMeta::default(), app_name),
                    spec: PodSpec {
                        service_account_name: service_account.metadata.name.clone(),
                        containers: vec![container],
                    },
                },
                strategy: DeploymentStrategy {
                    type_: "Rolling".to_string(),
                },
                triggers: vec![
                    DeploymentTriggerPolicy {
                        type_: "ConfigChange".to_string(),
                        image_change_params: None,
                    },
                    DeploymentTriggerPolicy {
                        type_: "ImageChange".to_string(),
                        image_change_params: Some(DeploymentTriggerImageChangeParams {
                            automatic: true,
                            container_names: vec![app_name.to_string()],
                            from: runner_image.clone(),
                        }),
                    },
                ],
            },
        };

        match image.and_then(DockerImage::labels) {
            Some(labels) => {
                Self::promote_labels(&mut deployment, labels);
                Self::discover_ports_and_probes(&mut deployment, labels);
            }
            None => debug!(app = app_name, "no image labels; skipping port discovery"),
        }

        debug!(
            app = app_name,
            replicas = deployment.spec.replicas,
            image = %runner_image.name,
            "composed deployment"
        );
        Ok(deployment)
    }

    fn promote_labels(deployment: &mut DeploymentConfig, image_labels: &BTreeMap<String, String>) {
        for (key, value) in promoted_labels(image_labels) {
            deployment
                .metadata
                .labels
                .insert(key.clone(), value.clone());
            deployment.spec.selector.insert(key.clone(), value.clone());
            deployment.spec.template.metadata.labels.insert(key, value);
        }
    }

    fn discover_ports_and_probes(
        deployment: &mut DeploymentConfig,
        image_labels: &BTreeMap<String, String>,
    ) {
        let Some(services) = image_labels.get(LABEL_EXPOSE_SERVICES) else {
            return;
        };
        let ports = parse_exposed_services(services);
        if ports.is_empty() {
            return;
        }
        let probe = default_probe(&ports);

        if let Some(container) = deployment.spec.template.spec.containers.first_mut() {
            container.ports = ports;
            container.liveness_probe = probe.clone();
            container.readiness_probe = probe;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BaseImageTable, BuildCompiler};
    use crate::crd::{BuildSpec, EnvVarSpec, GitSource, KogitoAppSpec};
    use crate::identity::IdentityCompiler;
    use crate::meta::{ANNOTATION_MANAGED_BY, LABEL_APP_NAME};

    fn make_app(name: &str) -> KogitoApp {
        let mut app = KogitoApp::new(
            name,
            KogitoAppSpec {
                build: BuildSpec {
                    git_source: GitSource {
                        uri: "https://github.com/kiegroup/kogito-examples".to_string(),
                        context_dir: Some("jbpm-quarkus-example".to_string()),
                        reference: None,
                    },
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        app.metadata.namespace = Some("test".to_string());
        app
    }

    fn dependencies(app: &KogitoApp) -> (BuildConfig, ServiceAccount) {
        let table = BaseImageTable::default();
        let builds = BuildCompiler::new(&table);
        let s2i = builds.compile_s2i(app).unwrap();
        let runner = builds.compile_runner(app, Some(&s2i)).unwrap();
        let sa = IdentityCompiler::compile_service_account(app).unwrap();
        (runner, sa)
    }

    fn compile_with(app: &KogitoApp, image: Option<&DockerImage>) -> DeploymentConfig {
        let (runner, sa) = dependencies(app);
        WorkloadCompiler::compile(app, Some(&runner), Some(&sa), image).unwrap()
    }

    // =========================================================================
    // Story: Preconditions
    // =========================================================================

    #[test]
    fn story_requires_runner_build() {
        let app = make_app("orders");
        let (_, sa) = dependencies(&app);
        let err = WorkloadCompiler::compile(&app, None, Some(&sa), None).unwrap_err();
        assert!(err.is_missing_dependency());
        assert!(err.to_string().contains("runner BuildConfig"));
    }

    #[test]
    fn story_requires_service_account() {
        let app = make_app("orders");
        let (runner, _) = dependencies(&app);
        let err = WorkloadCompiler::compile(&app, Some(&runner), None, None).unwrap_err();
        assert!(err.is_missing_dependency());
        assert!(err.to_string().contains("ServiceAccount"));
    }

    // =========================================================================
    // Story: The pod runs the runner image as kogito-service
    // =========================================================================

    #[test]
    fn story_container_wired_to_runner_output() {
        let mut app = make_app("orders");
        app.spec.env = vec![EnvVarSpec::new("JAVA_OPTS", "-Xmx256m")];
        let deployment = compile_with(&app, None);

        assert_eq!(deployment.api_version, "apps.openshift.io/v1");
        assert_eq!(deployment.kind, "DeploymentConfig");
        assert_eq!(deployment.metadata.name, "orders");
        assert_eq!(deployment.spec.template.spec.service_account_name, "kogito-service");

        let container = deployment.main_container().unwrap();
        assert_eq!(container.name, "orders");
        assert_eq!(container.image, "orders:latest");
        assert_eq!(container.image_pull_policy, "Always");
        assert_eq!(container.env[0].name, "JAVA_OPTS");
        assert!(container.resources.is_none());
    }

    #[test]
    fn story_resources_copied_from_spec() {
        let mut app = make_app("orders");
        app.spec.resources = Some(ResourcesSpec {
            requests: Some(ResourceQuantitySpec {
                cpu: Some("250m".to_string()),
                memory: Some("256Mi".to_string()),
            }),
            limits: Some(ResourceQuantitySpec {
                cpu: Some("1".to_string()),
                memory: None,
            }),
        });
        let deployment = compile_with(&app, None);
        let resources = deployment.main_container().unwrap().resources.clone().unwrap();
        assert_eq!(resources.requests.unwrap().memory.as_deref(), Some("256Mi"));
        assert_eq!(resources.limits.unwrap().cpu.as_deref(), Some("1"));
    }

    #[test]
    fn story_rolling_strategy_with_two_triggers() {
        let deployment = compile_with(&make_app("orders"), None);

        assert_eq!(deployment.spec.strategy.type_, "Rolling");
        assert_eq!(deployment.spec.triggers.len(), 2);
        assert_eq!(deployment.spec.triggers[0].type_, "ConfigChange");
        assert!(deployment.spec.triggers[0].image_change_params.is_none());

        let image_change = &deployment.spec.triggers[1];
        assert_eq!(image_change.type_, "ImageChange");
        let params = image_change.image_change_params.as_ref().unwrap();
        assert!(params.automatic);
        assert_eq!(params.container_names, vec!["orders".to_string()]);
        assert_eq!(params.from.name, "orders:latest");
        assert_eq!(params.from.kind, "ImageStreamTag");
    }

    #[test]
    fn story_stamped_metadata_selector_and_template() {
        let deployment = compile_with(&make_app("orders"), None);

        assert_eq!(
            deployment.metadata.labels.get(LABEL_APP_NAME),
            Some(&"orders".to_string())
        );
        assert!(deployment
            .metadata
            .annotations
            .contains_key(ANNOTATION_MANAGED_BY));
        assert_eq!(deployment.spec.selector, default_labels("orders"));
        assert_eq!(
            deployment.spec.template.metadata.labels,
            default_labels("orders")
        );
        assert!(deployment
            .spec
            .template
            .metadata
            .annotations
            .contains_key(ANNOTATION_MANAGED_BY));
    }

    // =========================================================================
    // Story: Replica count
    // =========================================================================

    #[test]
    fn story_replicas_default_to_one() {
        assert_eq!(compile_with(&make_app("orders"), None).spec.replicas, 1);

        let mut app = make_app("orders");
        app.spec.replicas = Some(3);
        assert_eq!(compile_with(&app, None).spec.replicas, 3);
    }

    // =========================================================================
    // Story: org.kie labels are promoted
    // =========================================================================

    #[test]
    fn story_org_kie_labels_promoted_everywhere() {
        let image = DockerImage::with_labels([("org.kie/operator", "kogito")]);
        let deployment = compile_with(&make_app("orders"), Some(&image));

        let kogito = Some(&"kogito".to_string());
        assert_eq!(deployment.metadata.labels.get("operator"), kogito);
        assert_eq!(deployment.spec.selector.get("operator"), kogito);
        assert_eq!(
            deployment.spec.template.metadata.labels.get("operator"),
            kogito
        );
    }

    #[test]
    fn story_unrelated_labels_not_promoted() {
        let image = DockerImage::with_labels([
            ("maintainer", "kie"),
            ("io.k8s.description", "runner"),
            ("org.kie/", "empty-suffix"),
        ]);
        let with_labels = compile_with(&make_app("orders"), Some(&image));
        let without = compile_with(&make_app("orders"), None);

        assert_eq!(with_labels.metadata.labels, without.metadata.labels);
        assert_eq!(with_labels.spec.selector, without.spec.selector);
        assert_eq!(
            with_labels.spec.template.metadata.labels,
            without.spec.template.metadata.labels
        );
    }

    // =========================================================================
    // Story: Ports and probes come from the exposed-services label
    // =========================================================================

    #[test]
    fn story_http_port_gets_tcp_probes() {
        let image = DockerImage::with_labels([(LABEL_EXPOSE_SERVICES, "8080:http")]);
        let deployment = compile_with(&make_app("orders"), Some(&image));
        let container = deployment.main_container().unwrap();

        assert_eq!(container.ports.len(), 1);
        assert_eq!(container.ports[0].name, "http");
        assert_eq!(container.ports[0].container_port, 8080);
        assert_eq!(container.ports[0].protocol, "TCP");

        let expected = Probe::tcp(8080);
        assert_eq!(container.liveness_probe.as_ref(), Some(&expected));
        assert_eq!(container.readiness_probe.as_ref(), Some(&expected));

        let probe = container.liveness_probe.as_ref().unwrap();
        assert_eq!(probe.timeout_seconds, 1);
        assert_eq!(probe.period_seconds, 10);
        assert_eq!(probe.success_threshold, 1);
        assert_eq!(probe.failure_threshold, 3);
    }

    #[test]
    fn story_probe_only_from_http_entry() {
        let image = DockerImage::with_labels([(LABEL_EXPOSE_SERVICES, "9000:grpc,8080:http")]);
        let deployment = compile_with(&make_app("orders"), Some(&image));
        let container = deployment.main_container().unwrap();

        assert_eq!(container.ports.len(), 2);
        let probe = container.readiness_probe.as_ref().unwrap();
        assert_eq!(probe.tcp_socket.as_ref().unwrap().port, 8080);
    }

    #[test]
    fn story_no_http_entry_means_no_probe() {
        let image = DockerImage::with_labels([(LABEL_EXPOSE_SERVICES, "9000:grpc")]);
        let deployment = compile_with(&make_app("orders"), Some(&image));
        let container = deployment.main_container().unwrap();

        assert_eq!(container.ports.len(), 1);
        assert!(container.liveness_probe.is_none());
        assert!(container.readiness_probe.is_none());
    }

    #[test]
    fn story_malformed_entries_are_skipped() {
        let ports = parse_exposed_services("notaport:http,8080:http,9000,1:2:3,:grpc, 9090 : metrics ,");
        let found: Vec<(u16, &str)> = ports
            .iter()
            .map(|p| (p.container_port, p.name.as_str()))
            .collect();
        assert_eq!(found, vec![(8080, "http"), (9090, "metrics")]);
    }

    #[test]
    fn story_all_malformed_leaves_deployment_unexposed() {
        let image = DockerImage::with_labels([(LABEL_EXPOSE_SERVICES, "notaport:http")]);
        let deployment = compile_with(&make_app("orders"), Some(&image));
        let container = deployment.main_container().unwrap();

        assert!(container.ports.is_empty());
        assert!(container.liveness_probe.is_none());
    }

    #[test]
    fn story_missing_image_means_no_ports() {
        let deployment = compile_with(&make_app("orders"), None);
        let container = deployment.main_container().unwrap();
        assert!(container.ports.is_empty());
        assert!(container.readiness_probe.is_none());

        let bare = DockerImage::default();
        let deployment = compile_with(&make_app("orders"), Some(&bare));
        assert!(deployment.main_container().unwrap().ports.is_empty());
    }

    #[test]
    fn story_probe_serializes_tcp_socket() {
        let json = serde_json::to_value(Probe::tcp(8080)).unwrap();
        assert_eq!(json["tcpSocket"]["port"], 8080);
        assert_eq!(json["failureThreshold"], 3);
    }
}
