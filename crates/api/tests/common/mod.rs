//! Shared test harness: an app with temp directories, a recording mailer,
//! and request helpers.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use intake_api::config::ServerConfig;
use intake_api::routes;
use intake_api::state::AppState;
use intake_files::{LocalFileStore, NoopMirror, StagingArea};
use intake_notify::{DispatcherSettings, EmailError, Mailer, NotificationDispatcher};
use intake_store::ProjectStore;

/// The shared secret wired into the test configuration.
pub const TEST_CRON_SECRET: &str = "test-cron-secret";

/// One captured outbound email.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer double that records every send.
#[derive(Default, Clone)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn subjects_matching(&self, needle: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.subject.contains(needle))
            .count()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// A fully wired application over temp directories.
pub struct TestApp {
    pub app: Router,
    pub mailer: RecordingMailer,
    pub upload_root: PathBuf,
    pub staging_root: PathBuf,
    _upload_dir: tempfile::TempDir,
    _staging_dir: tempfile::TempDir,
}

/// Build a test app with the default 3-day staleness threshold.
pub fn test_app() -> TestApp {
    test_app_with_stale_days(3)
}

/// Build a test app with a custom staleness threshold.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn test_app_with_stale_days(stale_days: i64) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let staging_dir = tempfile::tempdir().unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.path().to_path_buf(),
        staging_dir: staging_dir.path().to_path_buf(),
        nas_mount_path: None,
        operator_email: "admin@intake.local".to_string(),
        base_url: "http://localhost:3000".to_string(),
        notify_timeout_secs: 5,
        cron_secret: TEST_CRON_SECRET.to_string(),
        reminder_stale_days: stale_days,
        reminder_scan_interval_secs: None,
    };

    let mailer = RecordingMailer::default();
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(mailer.clone()),
        DispatcherSettings {
            operator_email: config.operator_email.clone(),
            base_url: config.base_url.clone(),
            send_timeout: Duration::from_secs(config.notify_timeout_secs),
        },
    ));

    let state = AppState {
        store: Arc::new(ProjectStore::new()),
        files: Arc::new(LocalFileStore::new(config.upload_dir.clone())),
        staging: Arc::new(StagingArea::new(config.staging_dir.clone())),
        mirror: Arc::new(NoopMirror),
        dispatcher,
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        app,
        mailer,
        upload_root: upload_dir.path().to_path_buf(),
        staging_root: staging_dir.path().to_path_buf(),
        _upload_dir: upload_dir,
        _staging_dir: staging_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

pub async fn delete_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::DELETE, uri, body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a bearer-authorized POST with an empty body.
pub async fn post_bearer(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a multipart upload request for the `/api/v1/uploads` endpoint.
pub fn multipart_upload(
    project_id: &str,
    category: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    let mut body = Vec::new();
    for (name, value) in [("project_id", project_id), ("category", category)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/uploads")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Poll until `condition` holds, for assertions on fire-and-forget work.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

// ---------------------------------------------------------------------------
// Payload fixtures
// ---------------------------------------------------------------------------

/// A minimal valid creation body.
pub fn new_project_body() -> serde_json::Value {
    serde_json::json!({
        "company_name": "Acme Industries",
        "manager_name": "Jane Doe",
        "email": "jane@example.com",
        "phone": "010-1234-5678"
    })
}

/// A minimal valid payload for each wizard step.
pub fn valid_step_payload(step: u8) -> serde_json::Value {
    use serde_json::json;
    match step {
        1 => json!({
            "manager": {
                "name": "Jane Doe",
                "position": "Marketing Lead",
                "phone": "010-1234-5678",
                "email": "jane@example.com"
            },
            "company": {
                "name": "Acme Industries",
                "representative": "John Smith",
                "address": "25 Beopwon-ro 11-gil, Songpa-gu, Seoul",
                "business_number": "123-45-67890",
                "phone": "02-402-2589-0",
                "email": "info@example.com"
            }
        }),
        2 => json!({
            "hosting": {
                "provider": "Cafe24",
                "username": "acme",
                "password": "hunter2",
                "ftp_db_password": "hunter3"
            },
            "domain": {
                "provider": "Gabia",
                "address": "acme.example",
                "username": "acme",
                "password": "hunter4"
            }
        }),
        3 => json!({ "mail_records": [] }),
        4 => json!({
            "google": { "username": "acme", "password": "pw" },
            "naver": { "username": "acme", "password": "pw" },
            "site_info": { "title": "Acme", "description": "industrial equipment maker" }
        }),
        5 => json!({
            "references": [
                { "site": "https://example.com", "description": "clean layout" }
            ]
        }),
        6 => json!({
            "menu_structure": {
                "primary_menu": ["ABOUT US", "CONTACT"],
                "secondary_menu": { "ABOUT US": ["History"] }
            }
        }),
        7 => json!({ "uploaded_files": [] }),
        _ => unreachable!("step out of range"),
    }
}

/// Create a project through the API and return its JSON.
pub async fn create_project(test: &TestApp) -> serde_json::Value {
    let response = post_json(test.app.clone(), "/api/v1/projects", new_project_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
