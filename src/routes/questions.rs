use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::question_dto::{
    CreateQuestionRequest, QuestionResponse, QuestionWithOptions, UpdateQuestionRequest,
};
use crate::middleware::auth::Claims;
use crate::models::question::is_valid_question_type;
use crate::routes::require;
use crate::AppState;

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateQuestionRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let text = require(req.text, "text")?;
    let question_type = require(req.question_type, "question_type")?;
    let points = require(req.points, "points")?;
    let exam_id = require(req.exam_id, "exam_id")?;

    if !is_valid_question_type(&question_type) {
        return Err(crate::error::Error::BadRequest(format!(
            "Invalid question_type: {}",
            question_type
        )));
    }

    let (question, options) = state
        .question_service
        .create(
            claims.user_id()?,
            exam_id,
            &text,
            &question_type,
            points,
            req.order,
            req.options,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(QuestionResponse {
            message: "Question created successfully".to_string(),
            question: QuestionWithOptions { question, options },
        }),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let (question, options) = state
        .question_service
        .get(claims.user_id()?, question_id)
        .await?;
    Ok(Json(QuestionWithOptions { question, options }).into_response())
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<Uuid>,
    Json(req): Json<UpdateQuestionRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    if let Some(ref question_type) = req.question_type {
        if !is_valid_question_type(question_type) {
            return Err(crate::error::Error::BadRequest(format!(
                "Invalid question_type: {}",
                question_type
            )));
        }
    }

    let (question, options) = state
        .question_service
        .update(claims.user_id()?, question_id, req)
        .await?;
    Ok(Json(QuestionResponse {
        message: "Question updated successfully".to_string(),
        question: QuestionWithOptions { question, options },
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    state
        .question_service
        .delete(claims.user_id()?, question_id)
        .await?;
    Ok(Json(json!({ "message": "Question deleted successfully" })).into_response())
}

/// Creator's editing view of an exam's questions, correct answers
/// included.
#[axum::debug_handler]
pub async fn list_questions_for_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let questions = state
        .question_service
        .list_for_exam(claims.user_id()?, exam_id)
        .await?;
    let body: Vec<QuestionWithOptions> = questions
        .into_iter()
        .map(|(question, options)| QuestionWithOptions { question, options })
        .collect();
    Ok(Json(body).into_response())
}
