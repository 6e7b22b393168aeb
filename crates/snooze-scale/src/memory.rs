//! In-process [`WorkloadApi`] for tests and local dry runs.
//!
//! Behaves like a well-mannered API server: unknown namespaces list as empty,
//! successful scale calls update the stored replica count, and every call is
//! counted so callers can assert on side effects.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use snooze_core::{ControllerError, ControllerResult, Replicas, Workload};

use crate::workloads::WorkloadApi;

#[derive(Debug, Default)]
pub struct InMemoryWorkloads {
    /// namespace → ordered (name, replicas).
    namespaces: Mutex<BTreeMap<String, Vec<(String, Replicas)>>>,
    /// Workload names whose scale call fails.
    failing: Mutex<HashSet<String>>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
    scale_calls: AtomicUsize,
}

impl InMemoryWorkloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a namespace with workloads in the given order.
    pub fn with_namespace(self, namespace: &str, workloads: &[(&str, Replicas)]) -> Self {
        self.namespaces().insert(
            namespace.to_string(),
            workloads
                .iter()
                .map(|(name, replicas)| (name.to_string(), *replicas))
                .collect(),
        );
        self
    }

    /// Make every scale call for `name` fail.
    pub fn fail_workload(&self, name: &str) {
        lock(&self.failing).insert(name.to_string());
    }

    /// Make `list` fail as if the API server were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn scale_calls(&self) -> usize {
        self.scale_calls.load(Ordering::SeqCst)
    }

    /// Current replica count of a workload, if it exists.
    pub fn replicas(&self, namespace: &str, name: &str) -> Option<Replicas> {
        self.namespaces()
            .get(namespace)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| *r)
    }

    fn namespaces(&self) -> MutexGuard<'_, BTreeMap<String, Vec<(String, Replicas)>>> {
        lock(&self.namespaces)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl WorkloadApi for InMemoryWorkloads {
    async fn list(&self, namespace: &str) -> ControllerResult<Vec<Workload>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ControllerError::UpstreamUnavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(self
            .namespaces()
            .get(namespace)
            .map(|items| {
                items
                    .iter()
                    .map(|(name, replicas)| Workload::new(namespace, name, *replicas))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn scale(&self, namespace: &str, name: &str, replicas: Replicas) -> ControllerResult<()> {
        self.scale_calls.fetch_add(1, Ordering::SeqCst);
        if lock(&self.failing).contains(name) {
            return Err(ControllerError::ApplyFailure {
                workload: name.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let mut namespaces = self.namespaces();
        let entry = namespaces
            .get_mut(namespace)
            .and_then(|items| items.iter_mut().find(|(n, _)| n == name))
            .ok_or_else(|| ControllerError::ApplyFailure {
                workload: name.to_string(),
                reason: format!("deployment not found in namespace '{namespace}'"),
            })?;
        entry.1 = replicas;
        Ok(())
    }
}
