use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::middleware::auth::{create_token, Claims};
use crate::routes::require;
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let email = require(req.email, "email")?;
    let username = require(req.username, "username")?;
    let password = require(req.password, "password")?;

    let user = state
        .user_service
        .register(&email, &username, &password, req.is_admin.unwrap_or(false))
        .await?;

    let config = crate::config::get_config();
    let access_token = create_token(user.id, &config.jwt_secret, config.jwt_expiration_secs)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user,
            access_token,
        }),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> crate::error::Result<Response> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(crate::error::Error::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let user = state.user_service.login(&email, &password).await?;

    let config = crate::config::get_config();
    let access_token = create_token(user.id, &config.jwt_secret, config.jwt_expiration_secs)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
        access_token,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let user = state.user_service.get_user(claims.user_id()?).await?;
    Ok(Json(user).into_response())
}
