use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;

use crate::dto::result_dto::{EvaluateRequest, EvaluateResponse, ResultWithAnswers};
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let (result, answers) = state.result_service.get(claims.user_id()?, result_id).await?;
    Ok(Json(ResultWithAnswers { result, answers }).into_response())
}

#[axum::debug_handler]
pub async fn list_results_for_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let results = state
        .result_service
        .list_for_exam(claims.user_id()?, exam_id)
        .await?;
    Ok(Json(results).into_response())
}

#[axum::debug_handler]
pub async fn get_candidate_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let (result, answers) = state
        .result_service
        .get_for_candidate(claims.user_id()?, candidate_id)
        .await?;
    Ok(Json(ResultWithAnswers { result, answers }).into_response())
}

#[axum::debug_handler]
pub async fn evaluate_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<Uuid>,
    Json(req): Json<EvaluateRequest>,
) -> crate::error::Result<Response> {
    let Some(evaluations) = req.evaluations else {
        return Err(crate::error::Error::BadRequest(
            "No evaluations provided".to_string(),
        ));
    };

    let (result, answers) = state
        .result_service
        .evaluate(claims.user_id()?, result_id, evaluations, req.feedback)
        .await?;

    Ok(Json(EvaluateResponse {
        message: "Result evaluated successfully".to_string(),
        result: ResultWithAnswers { result, answers },
    })
    .into_response())
}

/// Interface point only; document generation belongs to an external
/// collaborator.
#[axum::debug_handler]
pub async fn export_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    // Ownership is checked first so a foreign result still reads as 404.
    let _ = state.result_service.get(claims.user_id()?, result_id).await?;
    Err(crate::error::Error::NotImplemented(
        "Export functionality not implemented yet".to_string(),
    ))
}
