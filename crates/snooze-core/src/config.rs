//! Controller configuration.
//!
//! Built once at startup (from CLI flags, environment, or a TOML file) and
//! shared read-only by the decision engine and both triggers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use crate::error::{ControllerError, ControllerResult};
use crate::types::Replicas;

/// Workloads left alone unless the operator says otherwise.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["default-http-backend", "nginx-ingress-controller"];

/// How the wake trigger answers a successful request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// `{"message": "..."}` acknowledgement.
    Json,
    /// HTML page that sends the browser back to the requested host.
    #[default]
    Redirect,
}

impl std::str::FromStr for ResponseMode {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseMode::Json),
            "redirect" | "html" => Ok(ResponseMode::Redirect),
            other => Err(ControllerError::Config(format!(
                "unknown response mode '{other}' (expected json or redirect)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Minutes between idle ticks.
    pub idle_interval_minutes: u64,
    /// Namespace the idle ticker scales down. No ticker runs when unset.
    pub idle_namespace: Option<String>,
    pub wake_replicas: Replicas,
    pub idle_replicas: Replicas,
    /// Workload names never touched, in any namespace.
    pub exclusions: BTreeSet<String>,
    pub response: ResponseMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            idle_interval_minutes: 2,
            idle_namespace: None,
            wake_replicas: 1,
            idle_replicas: 0,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            response: ResponseMode::default(),
        }
    }
}

impl ControllerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ControllerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check invariants that cannot be expressed in the types.
    pub fn validate(self) -> ControllerResult<Self> {
        if self.idle_interval_minutes == 0 {
            return Err(ControllerError::Config(
                "idle interval must be at least one minute".to_string(),
            ));
        }
        if self.idle_interval_minutes.checked_mul(60).is_none() {
            return Err(ControllerError::Config(format!(
                "idle interval of {} minutes is too large",
                self.idle_interval_minutes
            )));
        }
        if self.wake_replicas < 0 || self.idle_replicas < 0 {
            return Err(ControllerError::Config(format!(
                "replica counts must be non-negative (wake={}, idle={})",
                self.wake_replicas, self.idle_replicas
            )));
        }
        if let Some(ns) = &self.idle_namespace
            && ns.trim().is_empty()
        {
            return Err(ControllerError::Config(
                "idle namespace is set but empty".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_minutes.saturating_mul(60))
    }

    pub fn is_excluded(&self, workload: &str) -> bool {
        self.exclusions.contains(workload)
    }
}

/// Split a comma-separated exclusion list, dropping blanks.
pub fn parse_exclusions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
