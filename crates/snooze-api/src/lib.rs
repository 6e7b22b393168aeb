//! snooze-api — HTTP wake trigger.
//!
//! Every GET, on any path, is a wake signal for the namespace named in the
//! `X-Namespace` header. The handler scales that namespace to the configured
//! wake replica count and answers with either a JSON acknowledgement or an
//! HTML page that sends the browser back to the requested host.
//!
//! # Responses
//!
//! | Case | Status | Body |
//! |---|---|---|
//! | Header missing or empty | 400 | `{"error": "Missing 'X-Namespace' header"}` |
//! | Header not valid UTF-8 | 400 | `{"error": "Invalid 'X-Namespace' header"}` |
//! | Rejected request | 400 | `{"error": "..."}` |
//! | Scaled (json mode) | 200 | `{"message": "..."}` |
//! | Scaled (redirect mode) | 200 | HTML redirect page |
//! | API unreachable / every update failed | 500 | `{"error": "..."}` |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use snooze_scale::DecisionEngine;

/// Shared state for the wake handler.
#[derive(Clone)]
pub struct ApiState {
    pub engine: DecisionEngine,
}

/// Build the wake trigger router.
pub fn build_router(engine: DecisionEngine) -> Router {
    let state = ApiState { engine };

    Router::new()
        .route("/", get(handlers::wake))
        .route("/{*path}", get(handlers::wake))
        .with_state(state)
}
