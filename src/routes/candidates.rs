use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use url::Url;
use uuid::Uuid;
use validator::Validate;

use crate::dto::candidate_dto::{
    CandidateResponse, CreateCandidateRequest, InvitationResponse, UpdateCandidateRequest,
};
use crate::middleware::auth::Claims;
use crate::routes::require;
use crate::AppState;

#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCandidateRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let name = require(req.name, "name")?;
    let email = require(req.email, "email")?;
    let exam_id = require(req.exam_id, "exam_id")?;

    let candidate = state
        .candidate_service
        .create(claims.user_id()?, &name, &email, exam_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CandidateResponse {
            message: "Candidate created successfully".to_string(),
            candidate,
        }),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let candidates = state.candidate_service.list(claims.user_id()?).await?;
    Ok(Json(candidates).into_response())
}

#[axum::debug_handler]
pub async fn list_candidates_for_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let candidates = state
        .candidate_service
        .list_for_exam(claims.user_id()?, exam_id)
        .await?;
    Ok(Json(candidates).into_response())
}

#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let candidate = state
        .candidate_service
        .get(claims.user_id()?, candidate_id)
        .await?;
    Ok(Json(candidate).into_response())
}

#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
    Json(req): Json<UpdateCandidateRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let candidate = state
        .candidate_service
        .update(claims.user_id()?, candidate_id, req)
        .await?;
    Ok(Json(CandidateResponse {
        message: "Candidate updated successfully".to_string(),
        candidate,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    state
        .candidate_service
        .delete(claims.user_id()?, candidate_id)
        .await?;
    Ok(Json(json!({ "message": "Candidate deleted successfully" })).into_response())
}

/// Queues the invitation mail and marks the candidate invited. Mail
/// delivery itself happens in the outbox worker; a queue failure is
/// reported as a JSON body with `success: false`.
#[axum::debug_handler]
pub async fn send_invitation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let creator_id = claims.user_id()?;
    let candidate = state.candidate_service.get(creator_id, candidate_id).await?;
    let exam = state.exam_service.get(creator_id, candidate.exam_id).await?;

    let config = crate::config::get_config();
    let access_link = build_access_link(&config.frontend_base_url, &candidate.unique_link)?;

    match state
        .notification_service
        .enqueue_invitation(&candidate, &exam.title, &access_link)
        .await
    {
        Ok(_) => {
            let candidate = state.candidate_service.mark_invited(candidate.id).await?;
            Ok(Json(InvitationResponse {
                success: true,
                message: "Invitation queued for delivery".to_string(),
                candidate,
                access_link,
            })
            .into_response())
        }
        Err(err) => {
            tracing::error!(candidate_id = %candidate.id, error = ?err, "Failed to queue invitation");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": format!("Failed to queue invitation: {}", err),
                })),
            )
                .into_response())
        }
    }
}

fn build_access_link(base: &str, unique_link: &str) -> crate::error::Result<String> {
    // Parse up front so a misconfigured base URL fails loudly here
    // instead of producing broken links in outgoing mail.
    Url::parse(base).map_err(|e| {
        crate::error::Error::Config(format!("Invalid FRONTEND_BASE_URL: {}", e))
    })?;
    Ok(format!(
        "{}/exam/{}",
        base.trim_end_matches('/'),
        unique_link
    ))
}
