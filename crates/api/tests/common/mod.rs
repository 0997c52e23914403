#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use campus_api::app::build_app;
use campus_api::auth::jwt::{generate_access_token, JwtConfig};
use campus_api::config::ServerConfig;
use campus_api::documents::FileSystemGenerator;
use campus_api::state::AppState;
use campus_core::document::{
    CertificateDocument, DocumentError, DocumentGenerator, GeneratedDocument,
};
use campus_core::roles::UserRole;
use campus_core::types::DbId;
use campus_db::models::student::{CreateStudent, Student};
use campus_db::repositories::StudentRepo;
use campus_events::EventBus;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// JWT settings shared by the app under test and [`token_for`].
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-long-enough-for-hs256".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(storage_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        certificate_storage_dir: storage_dir,
        institution_name: "Test College".to_string(),
        jwt: test_jwt_config(),
    }
}

/// Application state backed by `pool` and the given generator.
///
/// The storage directory lives under the system temp dir; tests only
/// need it to be writable.
pub fn test_state(pool: PgPool, documents: Arc<dyn DocumentGenerator>) -> AppState {
    let storage_dir = std::env::temp_dir().join("campus-api-tests");
    AppState {
        pool,
        config: Arc::new(test_config(storage_dir)),
        event_bus: Arc::new(EventBus::default()),
        documents,
    }
}

/// Build the full application router with a filesystem generator rooted
/// in a fresh temporary directory.
///
/// Mirrors `main.rs`, so integration tests exercise the same middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_test_app(pool: PgPool) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let documents = Arc::new(FileSystemGenerator::new(dir.path()));
    (build_app(test_state(pool, documents)), dir)
}

/// Build the application with a caller-supplied generator.
pub fn build_test_app_with(pool: PgPool, documents: Arc<dyn DocumentGenerator>) -> Router {
    build_app(test_state(pool, documents))
}

/// A generator whose every call fails, standing in for an unavailable
/// document service.
pub struct FailingGenerator;

#[async_trait]
impl DocumentGenerator for FailingGenerator {
    async fn generate(
        &self,
        _document: &CertificateDocument,
    ) -> Result<GeneratedDocument, DocumentError> {
        Err(DocumentError::Failed("renderer unavailable".into()))
    }

    async fn open(&self, reference: &str) -> Result<Vec<u8>, DocumentError> {
        Err(DocumentError::NotFound(reference.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Identity helpers
// ---------------------------------------------------------------------------

/// Bearer token for `user_id` acting as `role`.
pub fn token_for(user_id: DbId, role: UserRole) -> String {
    generate_access_token(user_id, role, &test_jwt_config()).expect("token generation")
}

/// User ids the reviewer tokens are issued to.
pub const ADVISOR_USER: DbId = 9001;
pub const HOD_USER: DbId = 9002;
pub const OFFICE_USER: DbId = 9003;
pub const PRINCIPAL_USER: DbId = 9004;
pub const ADMIN_USER: DbId = 9005;

pub fn advisor() -> String {
    token_for(ADVISOR_USER, UserRole::Advisor)
}

pub fn hod() -> String {
    token_for(HOD_USER, UserRole::Hod)
}

pub fn office() -> String {
    token_for(OFFICE_USER, UserRole::Office)
}

pub fn principal() -> String {
    token_for(PRINCIPAL_USER, UserRole::Principal)
}

pub fn admin() -> String {
    token_for(ADMIN_USER, UserRole::Admin)
}

/// Register a student directly in the database.
pub async fn seed_student(pool: &PgPool, user_id: DbId, reg: &str, name: &str) -> Student {
    StudentRepo::create(
        pool,
        &CreateStudent {
            user_id,
            registration_number: reg.to_string(),
            full_name: name.to_string(),
            department: Some("Computer Science".to_string()),
        },
    )
    .await
    .expect("student creation should succeed")
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request failed")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
