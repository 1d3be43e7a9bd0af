// Route tests for the auth endpoints
// Runs the full router against in-memory stores

use super::*;
use crate::auth::{
    AccountRegistry, InMemoryAccountRegistry, InMemorySessionTokenStore, PasswordService,
    TokenKind, TokenService,
};
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

const SECRET: &str = "test_secret_key_for_testing_purposes";

// ============================================================================
// Test Helpers
// ============================================================================

struct TestApp {
    server: TestServer,
    accounts: Arc<InMemoryAccountRegistry>,
    sessions: Arc<InMemorySessionTokenStore>,
}

fn test_auth_config() -> AuthConfig {
    let mut config = AuthConfig::new(SECRET);
    config.password_hash_cost = 1;
    config
}

fn create_test_app() -> TestApp {
    create_test_app_with_messages(MessageCatalog::default())
}

fn create_test_app_with_messages(messages: MessageCatalog) -> TestApp {
    let accounts = Arc::new(InMemoryAccountRegistry::new());
    let sessions = Arc::new(InMemorySessionTokenStore::new());
    let state = AppState::new(
        &test_auth_config(),
        messages,
        accounts.clone(),
        sessions.clone(),
    )
    .unwrap();

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        accounts,
        sessions,
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn credentials(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

async fn register(app: &TestApp, email: &str, password: &str) -> Value {
    let response = app
        .server
        .post("/api/auth/register")
        .json(&credentials(email, password))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

fn token_field(body: &Value, key: &str) -> String {
    body[key].as_str().unwrap_or_default().to_string()
}

// ============================================================================
// Register (POST /api/auth/register)
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let app = create_test_app();

    let body = register(&app, "a@x.com", "hunter2").await;

    assert_eq!(body["status"], json!(true));
    assert_eq!(body["message"], json!("Account has been created"));
    assert!(!token_field(&body, "accessToken").is_empty());
    assert!(!token_field(&body, "refreshToken").is_empty());

    let accounts = app.accounts.find_by_email("a@x.com").await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_ne!(accounts[0].password_hash, "hunter2");
    assert!(PasswordService::new(1)
        .unwrap()
        .verify_password(&accounts[0].password_hash, "hunter2")
        .is_ok());

    let record = app.sessions.get(accounts[0].id).await.unwrap();
    assert_eq!(record.refresh_token, token_field(&body, "refreshToken"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app();
    register(&app, "a@x.com", "hunter2").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&credentials("a@x.com", "another-password"))
        .await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    let body = response.json::<Value>();
    assert_eq!(body["status"], json!(false));
    assert_eq!(body["message"], json!("Account with this email already exists"));
    assert!(body.get("accessToken").is_none());
}

#[tokio::test]
async fn test_register_invalid_email_is_bad_request() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&credentials("not-an-email", "hunter2"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], json!("Bad request"));
    assert_eq!(app.accounts.len().await, 0);
}

#[tokio::test]
async fn test_register_missing_field_is_bad_request() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "a@x.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login (POST /api/auth/login)
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "hunter2").await;

    let response = app
        .server
        .post("/api/auth/login")
        .add_header(header::AUTHORIZATION, bearer(&token_field(&registered, "accessToken")))
        .json(&credentials("a@x.com", "hunter2"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["status"], json!(true));
    assert!(!token_field(&body, "accessToken").is_empty());
    assert!(body.get("refreshToken").is_none());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_identical() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "hunter2").await;
    let auth = bearer(&token_field(&registered, "accessToken"));

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&credentials("a@x.com", "wrong"))
        .await;
    let unknown_email = app
        .server
        .post("/api/auth/login")
        .add_header(header::AUTHORIZATION, auth)
        .json(&credentials("nobody@x.com", "hunter2"))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(unknown_email.status_code(), StatusCode::FORBIDDEN);

    let wrong_body = wrong_password.json::<Value>();
    assert_eq!(wrong_body, unknown_email.json::<Value>());
    assert!(wrong_body.get("accessToken").is_none());
}

#[tokio::test]
async fn test_login_without_bearer_token_is_unauthorized() {
    let app = create_test_app();
    register(&app, "a@x.com", "hunter2").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&credentials("a@x.com", "hunter2"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["status"], json!(false));
}

#[tokio::test]
async fn test_login_with_refresh_token_is_unauthorized() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "hunter2").await;

    let response = app
        .server
        .post("/api/auth/login")
        .add_header(header::AUTHORIZATION, bearer(&token_field(&registered, "refreshToken")))
        .json(&credentials("a@x.com", "hunter2"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_rejection_uses_configured_messages() {
    let messages = MessageCatalog {
        unauthorized: "Please sign in again".to_string(),
        ..MessageCatalog::default()
    };
    let app = create_test_app_with_messages(messages);

    let response = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-token"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["status"], json!(false));
    assert_eq!(body["message"], json!("Please sign in again"));
}

// ============================================================================
// Refresh (POST /api/auth/refresh)
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_refresh_token() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "hunter2").await;

    let first = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&token_field(&registered, "refreshToken")))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first = first.json::<Value>();

    let second = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&token_field(&first, "refreshToken")))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second = second.json::<Value>();

    let first_token = token_field(&first, "refreshToken");
    let second_token = token_field(&second, "refreshToken");
    assert_ne!(first_token, second_token);
    assert_ne!(token_field(&registered, "refreshToken"), first_token);

    assert_eq!(app.sessions.len().await, 1);
    assert_eq!(app.sessions.get(1).await.unwrap().refresh_token, second_token);
}

#[tokio::test]
async fn test_rotated_out_refresh_token_is_unauthorized() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "hunter2").await;
    let original = token_field(&registered, "refreshToken");

    let rotated = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&original))
        .await;
    assert_eq!(rotated.status_code(), StatusCode::OK);
    let current = token_field(&rotated.json::<Value>(), "refreshToken");

    let replay = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&original))
        .await;

    assert_eq!(replay.status_code(), StatusCode::UNAUTHORIZED);
    let body = replay.json::<Value>();
    assert!(body.get("accessToken").is_none());
    assert!(body.get("refreshToken").is_none());
    assert_eq!(app.sessions.get(1).await.unwrap().refresh_token, current);
}

#[tokio::test]
async fn test_access_token_cannot_refresh_session() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "hunter2").await;

    let response = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&token_field(&registered, "accessToken")))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.sessions.get(1).await.unwrap().refresh_token,
        token_field(&registered, "refreshToken")
    );
}

#[tokio::test]
async fn test_refresh_without_session_record_is_unauthorized() {
    let app = create_test_app();
    let orphan_token = TokenService::new(&test_auth_config()).issue_refresh(42).unwrap();

    let response = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&orphan_token))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert!(body.get("accessToken").is_none());
    assert!(body.get("refreshToken").is_none());
    assert_eq!(app.sessions.get(42).await, None);
}

#[tokio::test]
async fn test_refresh_with_expired_token_is_unauthorized() {
    let app = create_test_app();
    register(&app, "a@x.com", "hunter2").await;
    let expired = TokenService::new(&test_auth_config())
        .issue(1, TokenKind::Refresh, 0)
        .unwrap();

    let response = app
        .server
        .post("/api/auth/refresh")
        .add_header(header::AUTHORIZATION, bearer(&expired))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// OpenAPI
// ============================================================================

#[tokio::test]
async fn test_openapi_document_lists_auth_paths() {
    let app = create_test_app();

    let response = app.server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc = response.json::<Value>();
    assert!(doc["paths"].get("/api/auth/register").is_some());
    assert!(doc["paths"].get("/api/auth/login").is_some());
    assert!(doc["paths"].get("/api/auth/refresh").is_some());
}
