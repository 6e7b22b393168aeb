//! Scale applier — one replica update per workload.
//!
//! Failures are captured in the returned [`ScaleOutcome`] instead of being
//! propagated, so one broken workload never stops the rest of a batch.

use std::sync::Arc;

use tracing::{debug, info, warn};

use snooze_core::{Replicas, ScaleOutcome, ScaleStatus, Workload};

use crate::workloads::WorkloadApi;

#[derive(Clone)]
pub struct ScaleApplier {
    api: Arc<dyn WorkloadApi>,
}

impl ScaleApplier {
    pub fn new(api: Arc<dyn WorkloadApi>) -> Self {
        Self { api }
    }

    /// Bring `workload` to `target` replicas.
    ///
    /// A workload already at the target is reported as applied without an
    /// API call. Otherwise exactly one update is issued and never retried.
    pub async fn apply(&self, workload: &Workload, target: Replicas) -> ScaleOutcome {
        let mut outcome = ScaleOutcome {
            workload_name: workload.name.clone(),
            previous_replicas: workload.current_replicas,
            target_replicas: target,
            status: ScaleStatus::Applied,
        };

        if workload.current_replicas == target {
            debug!(
                workload = %workload.name,
                namespace = %workload.namespace,
                replicas = target,
                "already at target"
            );
            return outcome;
        }

        match self
            .api
            .scale(&workload.namespace, &workload.name, target)
            .await
        {
            Ok(()) => {
                info!(
                    workload = %workload.name,
                    namespace = %workload.namespace,
                    from = workload.current_replicas,
                    replicas = target,
                    "deployment scaled"
                );
            }
            Err(e) => {
                warn!(
                    workload = %workload.name,
                    namespace = %workload.namespace,
                    replicas = target,
                    error = %e,
                    "scaling deployment failed"
                );
                outcome.status = ScaleStatus::Failed {
                    cause: e.to_string(),
                };
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryWorkloads;

    fn applier(api: &Arc<InMemoryWorkloads>) -> ScaleApplier {
        ScaleApplier::new(api.clone())
    }

    #[tokio::test]
    async fn applies_when_replicas_differ() {
        let api = Arc::new(InMemoryWorkloads::new().with_namespace("ns", &[("web", 0)]));
        let outcome = applier(&api)
            .apply(&Workload::new("ns", "web", 0), 1)
            .await;

        assert!(outcome.is_applied());
        assert_eq!(outcome.previous_replicas, 0);
        assert_eq!(outcome.target_replicas, 1);
        assert_eq!(api.scale_calls(), 1);
        assert_eq!(api.replicas("ns", "web"), Some(1));
    }

    #[tokio::test]
    async fn skips_update_when_converged() {
        let api = Arc::new(InMemoryWorkloads::new().with_namespace("ns", &[("web", 1)]));
        let outcome = applier(&api)
            .apply(&Workload::new("ns", "web", 1), 1)
            .await;

        assert!(outcome.is_applied());
        assert_eq!(outcome.previous_replicas, 1);
        assert_eq!(api.scale_calls(), 0);
    }

    #[tokio::test]
    async fn failure_is_captured_not_raised() {
        let api = Arc::new(InMemoryWorkloads::new().with_namespace("ns", &[("web", 1)]));
        api.fail_workload("web");

        let outcome = applier(&api)
            .apply(&Workload::new("ns", "web", 1), 0)
            .await;

        match outcome.status {
            ScaleStatus::Failed { cause } => assert!(cause.contains("injected failure")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(api.scale_calls(), 1);
    }
}
