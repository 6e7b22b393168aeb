//! snooze-kube — Kubernetes implementation of `WorkloadApi`.
//!
//! Workloads are `apps/v1` Deployments. Listing goes through the namespaced
//! Deployment API; scaling is a merge patch on the `scale` subresource, so
//! nothing but the replica count is touched.
//!
//! Credentials come from [`kube::Client::try_default`]: the in-cluster
//! service account when running in a pod, the local kubeconfig otherwise.

pub mod deployments;

pub use deployments::{KubeWorkloads, connect};
