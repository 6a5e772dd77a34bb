use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::public_dto::{
    AccessExamResponse, PublicExamView, PublicQuestionView, SubmitExamRequest, SubmitExamResponse,
};
use crate::AppState;

/// Candidate-facing view of the exam, reached only through the unique
/// link. Options are stripped of their correct-answer flags before
/// they leave the service.
#[axum::debug_handler]
pub async fn access_exam(
    State(state): State<AppState>,
    Path(unique_link): Path<String>,
) -> crate::error::Result<Response> {
    let (candidate, exam, questions) = state.session_service.access_exam(&unique_link).await?;

    let response = AccessExamResponse {
        exam: PublicExamView::from(&exam),
        questions: questions
            .iter()
            .map(|(question, options)| PublicQuestionView::from_question(question, options))
            .collect(),
        candidate,
    };
    Ok(Json(response).into_response())
}

#[axum::debug_handler]
pub async fn submit_exam(
    State(state): State<AppState>,
    Path(unique_link): Path<String>,
    Json(req): Json<SubmitExamRequest>,
) -> crate::error::Result<Response> {
    let answers = match req.answers {
        Some(answers) if !answers.is_empty() => answers,
        _ => {
            return Err(crate::error::Error::BadRequest(
                "No answers provided".to_string(),
            ))
        }
    };

    let result = state.session_service.submit_exam(&unique_link, answers).await?;

    Ok(Json(SubmitExamResponse {
        message: "Exam submitted successfully".to_string(),
        result,
    })
    .into_response())
}
