//! Shared types used across snooze crates.
//!
//! Every value here is created fresh per scale decision and dropped when the
//! decision returns. Nothing is cached or persisted.

use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, ControllerResult};

/// Replica counts follow the Kubernetes `int32` representation.
pub type Replicas = i32;

// ── Workload ───────────────────────────────────────────────────────

/// One scalable unit (a Deployment) as observed in a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Name, unique within the namespace.
    pub name: String,
    /// Namespace the workload was listed from. Used only for lookups.
    pub namespace: String,
    /// Replica count at the time of the snapshot.
    pub current_replicas: Replicas,
}

impl Workload {
    pub fn new(namespace: &str, name: &str, current_replicas: Replicas) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            current_replicas,
        }
    }
}

// ── Scale request ──────────────────────────────────────────────────

/// A validated `(namespace, target)` pair.
///
/// Only constructible through [`ScaleRequest::new`], so holding one means the
/// namespace is non-empty and the target is non-negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleRequest {
    namespace: String,
    target_replicas: Replicas,
}

impl ScaleRequest {
    pub fn new(namespace: &str, target_replicas: Replicas) -> ControllerResult<Self> {
        if namespace.trim().is_empty() {
            return Err(ControllerError::InvalidRequest(
                "namespace must not be empty".to_string(),
            ));
        }
        if target_replicas < 0 {
            return Err(ControllerError::InvalidRequest(format!(
                "target replicas must be non-negative, got {target_replicas}"
            )));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            target_replicas,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn target_replicas(&self) -> Replicas {
        self.target_replicas
    }
}

// ── Outcomes ───────────────────────────────────────────────────────

/// Result of scaling a single workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScaleStatus {
    /// The workload is at the target (either patched or already there).
    Applied,
    /// The update call failed.
    Failed { cause: String },
}

/// Per-workload outcome record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleOutcome {
    pub workload_name: String,
    pub previous_replicas: Replicas,
    pub target_replicas: Replicas,
    #[serde(flatten)]
    pub status: ScaleStatus,
}

impl ScaleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self.status, ScaleStatus::Applied)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ScaleStatus::Failed { .. })
    }
}

/// Overall classification of one namespace-level decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// Every eligible workload converged.
    FullySucceeded,
    /// At least one workload converged and at least one failed.
    PartialFailure,
    /// Every attempted workload failed.
    TotalFailure,
    /// Nothing was eligible for scaling.
    NoOp,
    /// The workload set could not be listed; nothing was attempted.
    Unavailable,
}

impl OverallStatus {
    /// Classify a finished fan-out. Only called once every outcome is in.
    pub fn classify(outcomes: &[ScaleOutcome]) -> Self {
        let applied = outcomes.iter().filter(|o| o.is_applied()).count();
        let failed = outcomes.len() - applied;
        match (applied, failed) {
            (0, 0) => OverallStatus::NoOp,
            (_, 0) => OverallStatus::FullySucceeded,
            (0, _) => OverallStatus::TotalFailure,
            _ => OverallStatus::PartialFailure,
        }
    }

    /// Whether the invocation should be reported as an internal failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, OverallStatus::TotalFailure | OverallStatus::Unavailable)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::FullySucceeded => "fully_succeeded",
            OverallStatus::PartialFailure => "partial_failure",
            OverallStatus::TotalFailure => "total_failure",
            OverallStatus::NoOp => "no_op",
            OverallStatus::Unavailable => "unavailable",
        }
    }
}

/// Aggregated result of one scale decision for a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceOutcome {
    pub namespace: String,
    pub target_replicas: Replicas,
    pub status: OverallStatus,
    /// Per-workload outcomes in snapshot order.
    pub outcomes: Vec<ScaleOutcome>,
    /// Cause when the listing itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NamespaceOutcome {
    pub fn completed(request: &ScaleRequest, outcomes: Vec<ScaleOutcome>) -> Self {
        Self {
            namespace: request.namespace().to_string(),
            target_replicas: request.target_replicas(),
            status: OverallStatus::classify(&outcomes),
            outcomes,
            error: None,
        }
    }

    pub fn unavailable(request: &ScaleRequest, cause: String) -> Self {
        Self {
            namespace: request.namespace().to_string(),
            target_replicas: request.target_replicas(),
            status: OverallStatus::Unavailable,
            outcomes: Vec::new(),
            error: Some(cause),
        }
    }

    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Human-readable summary used in logs and HTTP responses.
    pub fn summary(&self) -> String {
        match self.status {
            OverallStatus::Unavailable => format!(
                "namespace '{}' unavailable: {}",
                self.namespace,
                self.error.as_deref().unwrap_or("unknown error")
            ),
            OverallStatus::NoOp => format!(
                "No deployments to scale in namespace '{}'",
                self.namespace
            ),
            _ => format!(
                "Scaled {} of {} deployments in namespace '{}' to {}",
                self.applied_count(),
                self.outcomes.len(),
                self.namespace,
                self.target_replicas
            ),
        }
    }
}
