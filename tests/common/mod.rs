//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use commission_intake::clock::ManualClock;
use commission_intake::config::IntakeConfig;
use commission_intake::http::IntakeServer;
use commission_intake::sink::MemorySink;
use serde_json::Value;
use tower::ServiceExt;

/// 2026-10-19T08:00:00Z
pub const START_MILLIS: i64 = 1_792_396_800_000;

/// A server wired to an in-memory sink and a hand-driven clock.
pub struct Harness {
    pub router: Router,
    pub sink: Arc<MemorySink>,
    pub clock: Arc<ManualClock>,
    pub server: IntakeServer,
}

pub fn harness() -> Harness {
    harness_with(IntakeConfig::default(), MemorySink::new())
}

pub fn harness_with(config: IntakeConfig, sink: MemorySink) -> Harness {
    let sink = Arc::new(sink);
    let clock = Arc::new(ManualClock::from_millis(START_MILLIS));
    let server = IntakeServer::with_clock(config, sink.clone(), clock.clone());
    Harness {
        router: server.router(),
        sink,
        clock,
        server,
    }
}

/// Build a submit request with optional extra headers.
pub fn submit_request(body: impl Into<Body>, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::post("/api/submit").header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(body.into()).unwrap()
}

/// Send one request through the router and decode the JSON body.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// POST a JSON value from the given client address.
pub async fn submit_from(router: &Router, client: &str, body: &Value) -> (StatusCode, Value) {
    send(
        router,
        submit_request(body.to_string(), &[("x-forwarded-for", client)]),
    )
    .await
}
