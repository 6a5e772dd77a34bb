use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::result::{Answer, ExamResult};

#[derive(Debug, Clone, Serialize)]
pub struct ResultWithAnswers {
    #[serde(flatten)]
    pub result: ExamResult,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationEntry {
    pub answer_id: Option<Uuid>,
    pub points_awarded: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub evaluations: Option<Vec<EvaluationEntry>>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluateResponse {
    pub message: String,
    pub result: ResultWithAnswers,
}
