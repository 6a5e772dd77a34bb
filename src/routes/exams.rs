use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::exam_dto::{CreateExamRequest, ExamResponse, UpdateExamRequest};
use crate::middleware::auth::Claims;
use crate::routes::require;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_exams(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let exams = state.exam_service.list(claims.user_id()?).await?;
    Ok(Json(exams).into_response())
}

#[axum::debug_handler]
pub async fn create_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateExamRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let title = require(req.title, "title")?;
    let duration_minutes = require(req.duration_minutes, "duration_minutes")?;
    let passing_score = require(req.passing_score, "passing_score")?;

    let exam = state
        .exam_service
        .create(
            claims.user_id()?,
            &title,
            req.description,
            duration_minutes,
            passing_score,
            req.is_randomized.unwrap_or(false),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExamResponse {
            message: "Exam created successfully".to_string(),
            exam,
        }),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn get_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let exam = state.exam_service.get(claims.user_id()?, exam_id).await?;
    Ok(Json(exam).into_response())
}

#[axum::debug_handler]
pub async fn update_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<Uuid>,
    Json(req): Json<UpdateExamRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let exam = state
        .exam_service
        .update(claims.user_id()?, exam_id, req)
        .await?;
    Ok(Json(ExamResponse {
        message: "Exam updated successfully".to_string(),
        exam,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn delete_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    state.exam_service.delete(claims.user_id()?, exam_id).await?;
    Ok(Json(json!({ "message": "Exam deleted successfully" })).into_response())
}
