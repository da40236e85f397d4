//! Shared helpers for gateway integration tests
//!
//! - Temporary SQLite database per test
//! - Stub scoring service bound to an ephemeral port
//! - Multipart request builder
//! - Storage fault injection via a SQLite trigger

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use scorecap_common::TypeSniffer;
use scorecap_gateway::db::{init_database_pool, ScoreStore};
use scorecap_gateway::services::{IngestionService, ScoringClient};
use scorecap_gateway::{build_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const BOUNDARY: &str = "scorecap-gateway-test-boundary";

pub const RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal PNG header (signature + IHDR)
pub fn png_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x02\0\0\0".to_vec();
    data.extend(std::iter::repeat(0xAB).take(512));
    data
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n<< /Type /Catalog >>\nendobj\n".to_vec()
}

/// Create temporary test database with the scores schema
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database_pool(&temp_dir.path().join("scores.db"))
        .await
        .expect("Should create test database");
    (temp_dir, pool)
}

/// Make every insert of `scenario` fail inside SQLite
pub async fn fail_inserts_for(pool: &SqlitePool, scenario: &str) {
    let sql = format!(
        "CREATE TRIGGER fail_insert BEFORE INSERT ON scores WHEN NEW.scenario = '{}' \
         BEGIN SELECT RAISE(ABORT, 'simulated storage fault'); END",
        scenario.replace('\'', "''")
    );
    sqlx::query(&sql).execute(pool).await.unwrap();
}

pub async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM scores")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Serve `router` on an ephemeral local port; returns its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Canned scoring service that records what it was sent
#[derive(Clone)]
pub struct StubScorer {
    pub base_url: String,
    pub calls: Arc<AtomicUsize>,
    /// (field name, filename) of every multipart part received
    pub received: Arc<Mutex<Vec<(String, String)>>>,
}

impl StubScorer {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<(String, String)>>>,
}

async fn stub_process(
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.calls.fetch_add(1, Ordering::SeqCst);

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let _ = field.bytes().await;
        state.received.lock().unwrap().push((name, filename));
    }

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// Start a stub answering every `/process` call with `status` and `body`
pub async fn stub_scorer(status: StatusCode, body: &str) -> StubScorer {
    slow_stub_scorer(status, body, Duration::ZERO).await
}

/// Like [`stub_scorer`] but waits `delay` before answering
pub async fn slow_stub_scorer(status: StatusCode, body: &str, delay: Duration) -> StubScorer {
    let calls = Arc::new(AtomicUsize::new(0));
    let received = Arc::new(Mutex::new(Vec::new()));

    let state = StubState {
        status,
        body: body.to_string(),
        delay,
        calls: Arc::clone(&calls),
        received: Arc::clone(&received),
    };
    let router = Router::new()
        .route("/process", post(stub_process))
        .with_state(state);

    StubScorer {
        base_url: serve(router).await,
        calls,
        received,
    }
}

/// Body the stub returns for a three-score batch
pub fn three_score_batch() -> String {
    serde_json::json!({
        "scores": [
            {"scenario": "VT Adjustshot VALORANT", "score": 805},
            {"scenario": "VT Flickspeed VALORANT", "score": 825},
            {"scenario": "VT Angleshot VALORANT", "score": 677},
        ]
    })
    .to_string()
}

/// Ingestion service pointed at `scorer_url`
pub fn ingestion_service(pool: &SqlitePool, scorer_url: &str) -> IngestionService {
    ingestion_service_with_timeout(pool, scorer_url, RELAY_TIMEOUT)
}

pub fn ingestion_service_with_timeout(
    pool: &SqlitePool,
    scorer_url: &str,
    timeout: Duration,
) -> IngestionService {
    let scorer = ScoringClient::new(scorer_url, timeout).expect("Should build scoring client");
    IngestionService::new(TypeSniffer::default(), scorer, ScoreStore::new(pool.clone()))
}

/// Full gateway router pointed at `scorer_url`
pub fn gateway_app(pool: &SqlitePool, scorer_url: &str) -> Router {
    build_router(AppState::new(ingestion_service(pool, scorer_url)))
}

/// Test helper: multipart POST with a single file field
pub fn multipart_request(uri: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

/// Test helper: JSON request
pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: request without body
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
