//! Wake trigger handler.

use askama::Template;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, warn};

use snooze_core::{ControllerError, NamespaceOutcome, ResponseMode};
use snooze_scale::engine::log_outcome;

use crate::ApiState;

pub const NAMESPACE_HEADER: &str = "x-namespace";
pub const MISSING_NAMESPACE: &str = "Missing 'X-Namespace' header";
pub const INVALID_NAMESPACE: &str = "Invalid 'X-Namespace' header";

/// Host used for the redirect when the request carries none.
const FALLBACK_HOST: &str = "default-hostname.com";
const REDIRECT_DELAY_SECS: u32 = 5;

fn error_response(msg: &str, status: StatusCode) -> Response {
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
}

#[derive(Template)]
#[template(path = "response.html")]
struct WakeTemplate<'a> {
    namespace: &'a str,
    message: &'a str,
    redirect_url: &'a str,
    delay_secs: u32,
}

fn render<T: Template>(tmpl: T) -> Response {
    match tmpl.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!(error = %e, "rendering wake page failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /{*path}
///
/// Scales the namespace named by `X-Namespace` to the wake replica count.
pub async fn wake(State(state): State<ApiState>, headers: HeaderMap, uri: Uri) -> Response {
    let namespace = match namespace_header(&headers) {
        Ok(ns) => ns,
        Err(msg) => {
            warn!(path = %uri.path(), reason = msg, "unusable X-Namespace header");
            return error_response(msg, StatusCode::BAD_REQUEST);
        }
    };

    let target = state.engine.config().wake_replicas;
    let outcome = match state.engine.decide(namespace, target).await {
        Ok(outcome) => outcome,
        Err(e @ ControllerError::InvalidRequest(_)) => {
            warn!(%namespace, error = %e, "wake request rejected");
            return error_response(&e.to_string(), StatusCode::BAD_REQUEST);
        }
        Err(e) => {
            error!(%namespace, error = %e, "wake failed");
            return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    log_outcome("wake", &outcome);

    if outcome.status.is_failure() {
        return error_response(&outcome.summary(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    match state.engine.config().response {
        ResponseMode::Json => Json(serde_json::json!({ "message": outcome.summary() })).into_response(),
        ResponseMode::Redirect => redirect_page(&outcome, &headers, &uri),
    }
}

fn redirect_page(outcome: &NamespaceOutcome, headers: &HeaderMap, uri: &Uri) -> Response {
    let redirect_url = redirect_target(headers, uri);
    render(WakeTemplate {
        namespace: &outcome.namespace,
        message: &outcome.summary(),
        redirect_url: &redirect_url,
        delay_secs: REDIRECT_DELAY_SECS,
    })
}

/// Scheme-relative URL pointing back at the requested host and path.
fn redirect_target(headers: &HeaderMap, uri: &Uri) -> String {
    let host = header_str(headers, "host").unwrap_or(FALLBACK_HOST);
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("//{host}{path}")
}

/// The namespace to wake. Absent or blank is missing; a value that is not
/// valid UTF-8 is invalid.
fn namespace_header(headers: &HeaderMap) -> Result<&str, &'static str> {
    let Some(value) = headers.get(NAMESPACE_HEADER) else {
        return Err(MISSING_NAMESPACE);
    };
    let ns = value.to_str().map_err(|_| INVALID_NAMESPACE)?.trim();
    if ns.is_empty() {
        return Err(MISSING_NAMESPACE);
    }
    Ok(ns)
}

/// A header value as trimmed, non-empty UTF-8.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
