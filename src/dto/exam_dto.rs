use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::exam::Exam;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExamRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub passing_score: Option<i32>,
    pub is_randomized: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExamRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub passing_score: Option<i32>,
    pub is_randomized: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamResponse {
    pub message: String,
    pub exam: Exam,
}
