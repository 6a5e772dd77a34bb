use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::question::{Question, QuestionOption};

#[derive(Debug, Clone, Deserialize)]
pub struct OptionPayload {
    pub text: Option<String>,
    pub is_correct: Option<bool>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub text: Option<String>,
    pub question_type: Option<String>,
    #[validate(range(min = 1))]
    pub points: Option<i32>,
    pub order: Option<i32>,
    pub exam_id: Option<Uuid>,
    pub options: Option<Vec<OptionPayload>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    pub text: Option<String>,
    pub question_type: Option<String>,
    #[validate(range(min = 1))]
    pub points: Option<i32>,
    pub order: Option<i32>,
    pub options: Option<Vec<OptionPayload>>,
}

/// Creator-side view: options carry their `is_correct` flags.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub message: String,
    pub question: QuestionWithOptions,
}
