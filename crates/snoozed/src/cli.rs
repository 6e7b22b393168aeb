//! Command-line and environment configuration.
//!
//! Every flag can also be set through its environment variable. When
//! `--config` is given the TOML file is the whole configuration and the
//! other flags are ignored.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use snooze_core::{ControllerConfig, ResponseMode, parse_exclusions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snoozed", about = "Scale namespaces up on traffic and down when idle")]
pub struct Cli {
    /// TOML configuration file. Replaces all other settings.
    #[arg(long, env = "SNOOZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind the wake trigger to.
    #[arg(long, env = "SNOOZE_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to bind the wake trigger to.
    #[arg(long, env = "SNOOZE_PORT", default_value = "8080")]
    pub port: u16,

    /// Minutes between idle ticks.
    #[arg(long, env = "CRON_MINUTES", default_value = "2")]
    pub cron_minutes: u64,

    /// Namespace the idle ticker scales down.
    #[arg(long, env = "CRON_NAMESPACE")]
    pub idle_namespace: Option<String>,

    /// Fallback for the idle namespace, usually injected via the downward API.
    #[arg(long, env = "POD_NAMESPACE", hide = true)]
    pub pod_namespace: Option<String>,

    /// Replicas applied on a wake request.
    #[arg(long, env = "SNOOZE_WAKE_REPLICAS", default_value = "1", allow_negative_numbers = true)]
    pub wake_replicas: i32,

    /// Replicas applied on an idle tick.
    #[arg(long, env = "SNOOZE_IDLE_REPLICAS", default_value = "0", allow_negative_numbers = true)]
    pub idle_replicas: i32,

    /// Comma-separated workload names that are never scaled.
    #[arg(
        long,
        env = "SNOOZE_EXCLUDE",
        default_value = "default-http-backend,nginx-ingress-controller"
    )]
    pub exclude: String,

    /// Wake response: `json` or `redirect`.
    #[arg(long, env = "SNOOZE_RESPONSE", default_value = "redirect")]
    pub response: ResponseMode,

    #[arg(long, env = "SNOOZE_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Resolve into a validated controller configuration.
    pub fn into_config(self) -> anyhow::Result<ControllerConfig> {
        let config = match &self.config {
            Some(path) => ControllerConfig::from_file(path)?,
            None => ControllerConfig {
                bind: self.bind,
                port: self.port,
                idle_interval_minutes: self.cron_minutes,
                idle_namespace: self
                    .idle_namespace
                    .or(self.pod_namespace)
                    .filter(|ns| !ns.trim().is_empty()),
                wake_replicas: self.wake_replicas,
                idle_replicas: self.idle_replicas,
                exclusions: parse_exclusions(&self.exclude),
                response: self.response,
            },
        };
        Ok(config.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["snoozed"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_build_config() {
        let config = parse(&[
            "--port",
            "9090",
            "--cron-minutes",
            "60",
            "--idle-namespace",
            "team-a",
            "--exclude",
            "ingress,metrics",
            "--response",
            "json",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:9090");
        assert_eq!(config.idle_interval_minutes, 60);
        assert_eq!(config.idle_namespace.as_deref(), Some("team-a"));
        assert!(config.is_excluded("metrics"));
        assert!(!config.is_excluded("nginx-ingress-controller"));
        assert_eq!(config.response, ResponseMode::Json);
    }

    #[test]
    fn pod_namespace_is_the_fallback() {
        let config = parse(&["--pod-namespace", "team-b"]).into_config().unwrap();
        assert_eq!(config.idle_namespace.as_deref(), Some("team-b"));

        let config = parse(&["--pod-namespace", "team-b", "--idle-namespace", "team-a"])
            .into_config()
            .unwrap();
        assert_eq!(config.idle_namespace.as_deref(), Some("team-a"));
    }

    #[test]
    fn blank_namespace_disables_idle_ticker() {
        let config = parse(&["--idle-namespace", " "]).into_config().unwrap();
        assert!(config.idle_namespace.is_none());
    }

    #[test]
    fn negative_replicas_rejected() {
        assert!(parse(&["--idle-replicas", "-1"]).into_config().is_err());
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(parse(&["--cron-minutes", "0"]).into_config().is_err());
    }

    #[test]
    fn interval_too_large_for_seconds_rejected() {
        let minutes = (u64::MAX / 2).to_string();
        assert!(parse(&["--cron-minutes", &minutes]).into_config().is_err());
    }

    #[test]
    fn unknown_response_mode_fails_to_parse() {
        assert!(Cli::try_parse_from(["snoozed", "--response", "xml"]).is_err());
    }
}
