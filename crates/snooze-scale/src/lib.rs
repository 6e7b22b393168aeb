//! snooze-scale — the scale decision engine.
//!
//! Both triggers funnel into [`DecisionEngine::decide`], which lists the
//! namespace's workloads through a [`WorkloadApi`], drops excluded names,
//! patches each remaining workload to the target, and classifies the result.
//!
//! # Decision flow
//!
//! ```text
//! decide(namespace, target)
//!   │
//!   ├── validate            → InvalidRequest
//!   ├── WorkloadApi::list   → Unavailable (nothing patched)
//!   ├── filter_excluded
//!   ├── ScaleApplier::apply (per workload, snapshot order)
//!   │
//!   ▼
//! NamespaceOutcome { FullySucceeded | PartialFailure | TotalFailure | NoOp }
//! ```

pub mod applier;
pub mod engine;
pub mod filter;
pub mod idle;
pub mod memory;
pub mod workloads;

pub use applier::ScaleApplier;
pub use engine::DecisionEngine;
pub use filter::filter_excluded;
pub use idle::IdleTicker;
pub use memory::InMemoryWorkloads;
pub use workloads::WorkloadApi;
