//! snooze-core — shared types, configuration, and errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ControllerConfig, DEFAULT_EXCLUSIONS, ResponseMode, parse_exclusions};
pub use error::{ControllerError, ControllerResult};
pub use types::*;
