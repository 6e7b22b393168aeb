//! The seam between the engine and the orchestration API.

use async_trait::async_trait;

use snooze_core::{ControllerResult, Replicas, Workload};

/// Access to the scalable workloads of a cluster.
///
/// Implementations must not cache: every `list` reflects the API server at
/// call time.
#[async_trait]
pub trait WorkloadApi: Send + Sync {
    /// Snapshot the workloads in `namespace`.
    ///
    /// A missing or empty namespace yields an empty list. Fails only with
    /// `UpstreamUnavailable`.
    async fn list(&self, namespace: &str) -> ControllerResult<Vec<Workload>>;

    /// Issue exactly one replica update for `name`. No internal retries.
    async fn scale(&self, namespace: &str, name: &str, replicas: Replicas) -> ControllerResult<()>;
}
