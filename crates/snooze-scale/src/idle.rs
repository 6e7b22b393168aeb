//! Idle ticker — periodic scale-down of a fixed namespace.
//!
//! Ticks are serialized: each tick awaits its decision before the next one
//! can fire, and ticks that fall due while a decision is still running are
//! skipped rather than queued. A failed tick is logged and the loop carries
//! on.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info};

use snooze_core::{ControllerResult, NamespaceOutcome, Replicas};

use crate::engine::{DecisionEngine, log_outcome};

pub struct IdleTicker {
    engine: DecisionEngine,
    namespace: String,
    target: Replicas,
    period: Duration,
}

impl IdleTicker {
    pub fn new(engine: DecisionEngine, namespace: &str, target: Replicas, period: Duration) -> Self {
        Self {
            engine,
            namespace: namespace.to_string(),
            target,
            period,
        }
    }

    /// Build a ticker from the engine's configuration, if an idle namespace
    /// is configured.
    pub fn from_config(engine: DecisionEngine) -> Option<Self> {
        let config = engine.config();
        let namespace = config.idle_namespace.clone()?;
        let target = config.idle_replicas;
        let period = config.idle_interval();
        Some(Self::new(engine, &namespace, target, period))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Run one decision for the idle namespace.
    pub async fn tick(&self) -> ControllerResult<NamespaceOutcome> {
        self.engine.decide(&self.namespace, self.target).await
    }

    /// Tick every `period` until `shutdown` flips. The first tick fires one
    /// period after start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            namespace = %self.namespace,
            target = self.target,
            interval_secs = self.period.as_secs(),
            "idle ticker started"
        );

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(outcome) => log_outcome("idle", &outcome),
                        Err(e) => error!(
                            namespace = %self.namespace,
                            error = %e,
                            "idle tick rejected"
                        ),
                    }
                }
                _ = shutdown.changed() => {
                    info!("idle ticker shutting down");
                    break;
                }
            }
        }
    }
}
