//! Sheets sink against a local stand-in for the token and append endpoints.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use commission_intake::clock::ManualClock;
use commission_intake::config::SinkConfig;
use commission_intake::sink::{ServiceAccountKey, SheetsSink, SinkError, SubmissionSink};
use commission_intake::submission::SheetRow;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const TEST_KEY: &str = include_str!("fixtures/test_service_account_key.pem");
const START_MILLIS: i64 = 1_792_396_800_000;

#[derive(Default)]
struct Recorded {
    token_requests: Vec<TokenForm>,
    appends: Vec<(Option<String>, Value)>,
}

#[derive(Clone)]
struct Fake {
    recorded: Arc<Mutex<Recorded>>,
    token_status: StatusCode,
    append_status: StatusCode,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenForm {
    grant_type: String,
    assertion: String,
}

async fn token(
    State(fake): State<Fake>,
    Form(form): Form<TokenForm>,
) -> (StatusCode, Json<Value>) {
    fake.recorded.lock().unwrap().token_requests.push(form);
    if fake.token_status.is_success() {
        let body = json!({
            "access_token": "ya29.test-token",
            "expires_in": 3600,
            "token_type": "Bearer"
        });
        (StatusCode::OK, Json(body))
    } else {
        (fake.token_status, Json(json!({"error": "invalid_grant"})))
    }
}

async fn append(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    fake.recorded.lock().unwrap().appends.push((auth, body));
    (fake.append_status, Json(json!({"updates": {"updatedRows": 1}})))
}

/// Start the stand-in server and return a sink pointed at it.
async fn start(
    token_status: StatusCode,
    append_status: StatusCode,
) -> (SheetsSink, Arc<Mutex<Recorded>>, Arc<ManualClock>) {
    let fake = Fake {
        recorded: Arc::new(Mutex::new(Recorded::default())),
        token_status,
        append_status,
    };
    let recorded = fake.recorded.clone();

    let app = Router::new()
        .route("/token", post(token))
        .route("/v4/spreadsheets/{id}/values/{range}", post(append))
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SinkConfig {
        token_uri: format!("http://{}/token", addr),
        api_base_url: format!("http://{}", addr),
        ..SinkConfig::default()
    };
    let clock = Arc::new(ManualClock::from_millis(START_MILLIS));
    let sink = SheetsSink::new(
        &config,
        "sheet-abc",
        ServiceAccountKey::new("intake@test-project.iam.gserviceaccount.com", TEST_KEY),
        Duration::from_secs(5),
        clock.clone(),
    )
    .unwrap();

    (sink, recorded, clock)
}

fn row(description: &str) -> SheetRow {
    SheetRow {
        timestamp: "2026-10-19T08:00:00.000Z".into(),
        name: "Anonymous".into(),
        genre: "Chamber".into(),
        description: description.into(),
    }
}

#[tokio::test]
async fn appends_row_with_bearer_token() {
    let (sink, recorded, _) = start(StatusCode::OK, StatusCode::OK).await;

    sink.append(row("A cello concerto.")).await.unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.token_requests.len(), 1);
    let form = &recorded.token_requests[0];
    assert_eq!(form.grant_type, "urn:ietf:params:oauth:grant-type:jwt-bearer");
    assert_eq!(form.assertion.split('.').count(), 3);

    let (auth, body) = &recorded.appends[0];
    assert_eq!(auth.as_deref(), Some("Bearer ya29.test-token"));
    assert_eq!(
        *body,
        json!({"values": [[
            "2026-10-19T08:00:00.000Z",
            "Anonymous",
            "Chamber",
            "A cello concerto."
        ]]})
    );
}

#[tokio::test]
async fn token_is_reused_until_near_expiry() {
    let (sink, recorded, clock) = start(StatusCode::OK, StatusCode::OK).await;

    sink.append(row("first")).await.unwrap();
    clock.advance(Duration::from_secs(1800));
    sink.append(row("second")).await.unwrap();
    assert_eq!(recorded.lock().unwrap().token_requests.len(), 1);

    // Inside the refresh margin of a one-hour token.
    clock.advance(Duration::from_secs(1750));
    sink.append(row("third")).await.unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.token_requests.len(), 2);
    assert_eq!(recorded.appends.len(), 3);
}

#[tokio::test]
async fn append_rejection_is_a_status_error() {
    let (sink, recorded, _) = start(StatusCode::OK, StatusCode::FORBIDDEN).await;

    let err = sink.append(row("x")).await.unwrap_err();
    assert!(matches!(err, SinkError::Status { status: 403, .. }), "{:?}", err);
    assert_eq!(recorded.lock().unwrap().appends.len(), 1);
}

#[tokio::test]
async fn unauthorized_append_drops_cached_token() {
    let (sink, recorded, _) = start(StatusCode::OK, StatusCode::UNAUTHORIZED).await;

    assert!(sink.append(row("x")).await.is_err());
    assert!(sink.append(row("y")).await.is_err());

    assert_eq!(recorded.lock().unwrap().token_requests.len(), 2);
}

#[tokio::test]
async fn token_refusal_skips_the_append() {
    let (sink, recorded, _) = start(StatusCode::BAD_REQUEST, StatusCode::OK).await;

    let err = sink.append(row("x")).await.unwrap_err();
    assert!(matches!(err, SinkError::Token(_)), "{:?}", err);
    assert!(recorded.lock().unwrap().appends.is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = SinkConfig {
        token_uri: format!("http://{}/token", addr),
        api_base_url: format!("http://{}", addr),
        ..SinkConfig::default()
    };
    let sink = SheetsSink::new(
        &config,
        "sheet-abc",
        ServiceAccountKey::new("intake@test-project.iam.gserviceaccount.com", TEST_KEY),
        Duration::from_secs(2),
        Arc::new(ManualClock::from_millis(START_MILLIS)),
    )
    .unwrap();

    let err = sink.append(row("x")).await.unwrap_err();
    assert!(matches!(err, SinkError::Http(_)), "{:?}", err);
}
