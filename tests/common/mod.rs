use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Prepares env-driven config for the test process. Returns false (and
/// the caller skips) when no database is available.
pub fn setup_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return false;
    }
    std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    std::env::set_var("JWT_SECRET", "test_secret_key");
    std::env::set_var("JWT_EXPIRATION_SECS", "3600");
    std::env::set_var("FRONTEND_BASE_URL", "http://localhost:3000");
    std::env::set_var("MAIL_WEBHOOK_URL", "http://localhost:9/mail");
    std::env::set_var("PUBLIC_RPS", "1000");
    std::env::set_var("CREATOR_RPS", "1000");
    let _ = exam_backend::config::init_config();
    true
}

pub async fn test_app() -> (Router, PgPool) {
    let pool = exam_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    let state = exam_backend::AppState::new(pool.clone());
    (exam_backend::app(state), pool)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

/// Registers a fresh user and returns their bearer token.
pub async fn register_user(app: &Router, label: &str) -> String {
    let suffix = Uuid::new_v4();
    let (status, body) = request(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": format!("{}_{}@example.com", label, suffix),
            "username": format!("{}_{}", label, suffix),
            "password": "correct horse battery staple",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["access_token"].as_str().expect("token").to_string()
}
