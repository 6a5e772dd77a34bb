mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn auth_flow_end_to_end() {
    if !common::setup_env() {
        return;
    }
    let (app, pool) = common::test_app().await;

    let suffix = Uuid::new_v4();
    let email = format!("creator_{}@example.com", suffix);
    let username = format!("creator_{}", suffix);

    // Health does not require a database round trip or a token.
    let (status, body) = common::request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    // Register.
    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "username": username,
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], email.as_str());
    // The hash must never be serialized.
    assert!(body["user"].get("password_hash").is_none());
    let token = body["access_token"].as_str().unwrap().to_string();

    // Missing field -> 400, not a framework 422.
    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": format!("x_{}@example.com", suffix), "username": format!("x_{}", suffix) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Duplicate email is rejected and no second row appears.
    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "username": format!("other_{}", suffix),
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Duplicate username.
    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": format!("second_{}@example.com", suffix),
            "username": username,
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already taken");

    // Login happy path.
    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["access_token"].as_str().is_some());

    // Wrong password and unknown email give the same 401.
    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": format!("nobody_{}@example.com", suffix), "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Current user.
    let (status, body) = common::request(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.as_str());

    let (status, _) = common::request(&app, "GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = common::request(&app, "GET", "/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
