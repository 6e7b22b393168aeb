//! Wake and idle trigger integration tests.
//!
//! Drives the HTTP wake trigger and the idle ticker against one shared
//! in-memory cluster, the way the daemon wires them together.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::sync::watch;
use tower::ServiceExt;

use snooze_api::build_router;
use snooze_core::{ControllerConfig, OverallStatus, ResponseMode};
use snooze_scale::{DecisionEngine, IdleTicker, InMemoryWorkloads};

fn cluster() -> Arc<InMemoryWorkloads> {
    Arc::new(
        InMemoryWorkloads::new()
            .with_namespace(
                "team-a",
                &[("web", 0), ("worker", 0), ("nginx-ingress-controller", 1)],
            )
            .with_namespace("team-b", &[("api", 0)]),
    )
}

fn engine(api: &Arc<InMemoryWorkloads>) -> DecisionEngine {
    let config = ControllerConfig {
        idle_namespace: Some("team-a".to_string()),
        response: ResponseMode::Json,
        ..Default::default()
    };
    DecisionEngine::new(api.clone(), Arc::new(config))
}

fn wake_request(namespace: &str) -> Request<Body> {
    Request::builder()
        .uri("/some/app/path")
        .header("X-Namespace", namespace)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn wake_then_idle_round_trip() {
    let api = cluster();
    let engine = engine(&api);
    let router = build_router(engine.clone());

    let resp = router.oneshot(wake_request("team-a")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(api.replicas("team-a", "web"), Some(1));
    assert_eq!(api.replicas("team-a", "worker"), Some(1));

    let ticker = IdleTicker::from_config(engine).unwrap();
    let outcome = ticker.tick().await.unwrap();
    assert_eq!(outcome.status, OverallStatus::FullySucceeded);
    assert_eq!(api.replicas("team-a", "web"), Some(0));
    assert_eq!(api.replicas("team-a", "worker"), Some(0));
    // Excluded workloads are never touched by either trigger.
    assert_eq!(api.replicas("team-a", "nginx-ingress-controller"), Some(1));
    // Other namespaces are untouched by the idle tick.
    assert_eq!(api.replicas("team-b", "api"), Some(0));
}

#[tokio::test]
async fn concurrent_wakes_for_different_namespaces() {
    let api = cluster();
    let router = build_router(engine(&api));

    let (a, b) = tokio::join!(
        router.clone().oneshot(wake_request("team-a")),
        router.clone().oneshot(wake_request("team-b")),
    );

    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);
    assert_eq!(api.replicas("team-a", "web"), Some(1));
    assert_eq!(api.replicas("team-b", "api"), Some(1));
}

#[tokio::test]
async fn concurrent_wakes_for_same_namespace_converge() {
    let api = cluster();
    let router = build_router(engine(&api));

    let (a, b) = tokio::join!(
        router.clone().oneshot(wake_request("team-a")),
        router.clone().oneshot(wake_request("team-a")),
    );

    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);
    assert_eq!(api.replicas("team-a", "web"), Some(1));
    assert_eq!(api.replicas("team-a", "worker"), Some(1));
}

#[tokio::test]
async fn missing_header_never_reaches_engine() {
    let api = cluster();
    let router = build_router(engine(&api));

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Missing 'X-Namespace' header" }));
    assert_eq!(api.list_calls(), 0);
    assert_eq!(api.scale_calls(), 0);
}

#[tokio::test]
async fn unknown_namespace_wake_is_harmless() {
    let api = cluster();
    let router = build_router(engine(&api));

    let resp = router.oneshot(wake_request("does-not-exist")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(api.scale_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn idle_ticker_runs_beside_wake_trigger() {
    let api = cluster();
    let engine = engine(&api);
    let router = build_router(engine.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = IdleTicker::new(engine, "team-a", 0, Duration::from_secs(120));
    let handle = tokio::spawn(ticker.run(shutdown_rx));

    let resp = router.clone().oneshot(wake_request("team-a")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(api.replicas("team-a", "web"), Some(1));

    tokio::time::sleep(Duration::from_secs(150)).await;
    assert_eq!(api.replicas("team-a", "web"), Some(0));

    // A new request wakes it again.
    let resp = router.oneshot(wake_request("team-a")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(api.replicas("team-a", "web"), Some(1));

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}
