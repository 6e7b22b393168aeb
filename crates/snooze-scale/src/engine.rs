//! Scale decision engine.
//!
//! Stateless per call: every decision lists a fresh snapshot, filters it,
//! and fans out one update per eligible workload in snapshot order. All
//! outcomes are collected before the namespace result is classified.
//!
//! # Concurrency
//!
//! The engine holds no lock over a namespace. Two decisions for the same
//! namespace (a wake and an idle tick, or two wakes) may interleave, and
//! the last update the API server applies wins. A scale-to-zero tick racing
//! a wake can therefore leave a workload at zero until the next request
//! arrives. This is accepted: the authoritative state lives in the API
//! server and a later wake converges it again.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use snooze_core::{
    ControllerConfig, ControllerResult, NamespaceOutcome, OverallStatus, Replicas, ScaleRequest,
};

use crate::applier::ScaleApplier;
use crate::filter::filter_excluded;
use crate::workloads::WorkloadApi;

#[derive(Clone)]
pub struct DecisionEngine {
    api: Arc<dyn WorkloadApi>,
    applier: ScaleApplier,
    config: Arc<ControllerConfig>,
}

impl DecisionEngine {
    pub fn new(api: Arc<dyn WorkloadApi>, config: Arc<ControllerConfig>) -> Self {
        Self {
            applier: ScaleApplier::new(api.clone()),
            api,
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Scale every eligible workload in `namespace` to `target` replicas.
    ///
    /// Fails only with `InvalidRequest`. An unreachable API server is
    /// reported as [`OverallStatus::Unavailable`] with nothing patched;
    /// per-workload failures are folded into the outcome.
    pub async fn decide(&self, namespace: &str, target: Replicas) -> ControllerResult<NamespaceOutcome> {
        let request = ScaleRequest::new(namespace, target)?;

        let snapshot = match self.api.list(request.namespace()).await {
            Ok(workloads) => workloads,
            // Without a snapshot we never scale blind.
            Err(e) => return Ok(NamespaceOutcome::unavailable(&request, e.to_string())),
        };

        let listed = snapshot.len();
        let eligible = filter_excluded(snapshot, &self.config.exclusions);
        debug!(
            namespace = %request.namespace(),
            listed,
            eligible = eligible.len(),
            target = request.target_replicas(),
            "workload snapshot"
        );

        let mut outcomes = Vec::with_capacity(eligible.len());
        for workload in &eligible {
            outcomes.push(self.applier.apply(workload, request.target_replicas()).await);
        }

        Ok(NamespaceOutcome::completed(&request, outcomes))
    }
}

/// Log a finished decision at a level matching its status.
pub fn log_outcome(trigger: &str, outcome: &NamespaceOutcome) {
    let status = outcome.status.label();
    match outcome.status {
        OverallStatus::FullySucceeded | OverallStatus::NoOp => info!(
            trigger,
            namespace = %outcome.namespace,
            target = outcome.target_replicas,
            status,
            applied = outcome.applied_count(),
            "scale decision finished"
        ),
        OverallStatus::PartialFailure => warn!(
            trigger,
            namespace = %outcome.namespace,
            target = outcome.target_replicas,
            status,
            applied = outcome.applied_count(),
            failed = outcome.failed_count(),
            "scale decision partially failed"
        ),
        OverallStatus::TotalFailure | OverallStatus::Unavailable => error!(
            trigger,
            namespace = %outcome.namespace,
            target = outcome.target_replicas,
            status,
            failed = outcome.failed_count(),
            error = outcome.error.as_deref().unwrap_or(""),
            "scale decision failed"
        ),
    }
}
