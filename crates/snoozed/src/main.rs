//! snoozed — the snooze daemon.
//!
//! Single process that runs:
//! - the wake trigger (HTTP on `0.0.0.0:8080` by default)
//! - the idle ticker (scale the configured namespace to zero every
//!   `CRON_MINUTES` minutes)
//!
//! # Usage
//!
//! ```text
//! CRON_NAMESPACE=team-a CRON_MINUTES=60 snoozed
//! snoozed --config /etc/snooze/snooze.toml
//! ```

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};

use snooze_scale::{DecisionEngine, IdleTicker};

use crate::cli::{Cli, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = Arc::new(cli.into_config()?);
    run(config).await
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,snooze=debug"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn run(config: Arc<snooze_core::ControllerConfig>) -> anyhow::Result<()> {
    info!(
        exclusions = ?config.exclusions,
        wake_replicas = config.wake_replicas,
        idle_replicas = config.idle_replicas,
        "snooze daemon starting"
    );

    // ── Subsystems ─────────────────────────────────────────────

    let client = snooze_kube::connect().await?;
    let workloads = Arc::new(snooze_kube::KubeWorkloads::new(client));
    let engine = DecisionEngine::new(workloads, config.clone());

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Idle ticker ────────────────────────────────────────────

    let idle_handle = match IdleTicker::from_config(engine.clone()) {
        Some(ticker) => Some(tokio::spawn(ticker.run(shutdown_rx.clone()))),
        None => {
            warn!("no idle namespace configured (CRON_NAMESPACE / POD_NAMESPACE), idle ticker disabled");
            None
        }
    };

    // ── Wake trigger ───────────────────────────────────────────

    let router = snooze_api::build_router(engine);
    let addr = config.listen_addr();
    info!(%addr, "wake trigger listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    if let Some(handle) = idle_handle {
        let _ = handle.await;
    }

    info!("snooze daemon stopped");
    Ok(())
}

/// Resolve on Ctrl-C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
