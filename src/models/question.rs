use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const QUESTION_TYPE_MULTIPLE_CHOICE: &str = "multiple_choice";
pub const QUESTION_TYPE_OPEN_ENDED: &str = "open_ended";

pub fn is_valid_question_type(question_type: &str) -> bool {
    question_type == QUESTION_TYPE_MULTIPLE_CHOICE || question_type == QUESTION_TYPE_OPEN_ENDED
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub question_type: String,
    pub points: i32,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
    pub exam_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        self.question_type == QUESTION_TYPE_MULTIPLE_CHOICE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionOption {
    pub id: Uuid,
    pub text: String,
    pub is_correct: bool,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
    pub question_id: Uuid,
}
