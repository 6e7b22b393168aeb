//! Deployment listing and scaling.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::Client;
use tracing::{debug, info};

use snooze_core::{ControllerError, ControllerResult, Replicas, Workload};
use snooze_scale::WorkloadApi;

/// Replicas the API server assumes when a Deployment omits the field.
const DEFAULT_REPLICAS: Replicas = 1;

/// Build a client from the ambient credentials.
pub async fn connect() -> ControllerResult<Client> {
    let client = Client::try_default()
        .await
        .map_err(|e| ControllerError::UpstreamUnavailable(format!("load cluster credentials: {e}")))?;
    info!("kubernetes client initialized");
    Ok(client)
}

/// [`WorkloadApi`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeWorkloads {
    client: Client,
}

impl KubeWorkloads {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl WorkloadApi for KubeWorkloads {
    async fn list(&self, namespace: &str) -> ControllerResult<Vec<Workload>> {
        let result = self
            .deployments(namespace)
            .list(&ListParams::default())
            .await
            .map(|list| list.items);
        workloads_from_list(namespace, result)
    }

    async fn scale(&self, namespace: &str, name: &str, replicas: Replicas) -> ControllerResult<()> {
        let patch = scale_patch(replicas);
        self.deployments(namespace)
            .patch_scale(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| ControllerError::ApplyFailure {
                workload: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Turn a Deployment listing into a snapshot. A missing namespace is an
/// empty snapshot; every other API failure means no snapshot.
fn workloads_from_list(
    namespace: &str,
    result: Result<Vec<Deployment>, kube::Error>,
) -> ControllerResult<Vec<Workload>> {
    match result {
        Ok(items) => Ok(items
            .iter()
            .filter_map(|d| workload_from_deployment(namespace, d))
            .collect()),
        Err(e) if is_not_found(&e) => {
            debug!(%namespace, "namespace not found, treating as empty");
            Ok(Vec::new())
        }
        Err(e) => Err(ControllerError::UpstreamUnavailable(format!(
            "list deployments in '{namespace}': {e}"
        ))),
    }
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

/// Map a Deployment to a workload. Objects without a name are skipped.
fn workload_from_deployment(namespace: &str, deployment: &Deployment) -> Option<Workload> {
    let name = deployment.metadata.name.as_deref()?;
    let replicas = deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(DEFAULT_REPLICAS);
    Some(Workload::new(namespace, name, replicas))
}

fn scale_patch(replicas: Replicas) -> serde_json::Value {
    serde_json::json!({ "spec": { "replicas": replicas } })
}
