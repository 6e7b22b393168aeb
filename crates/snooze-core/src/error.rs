//! Error taxonomy for scale decisions.

use thiserror::Error;

/// Result type alias for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors that can occur while deciding or applying a scale change.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Bad input from a trigger. User-correctable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The orchestration API could not be reached, rejected our credentials,
    /// or timed out.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A single workload's update failed. Never aborts a batch.
    #[error("failed to scale workload '{workload}': {reason}")]
    ApplyFailure { workload: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}
