use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::exam::Exam;
use crate::models::question::{Question, QuestionOption};
use crate::models::result::ExamResult;

/// Exam as shown to a candidate: identity and timing only, no
/// passing threshold or creator bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct PublicExamView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub is_randomized: bool,
}

impl From<&Exam> for PublicExamView {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id,
            title: exam.title.clone(),
            description: exam.description.clone(),
            duration_minutes: exam.duration_minutes,
            is_randomized: exam.is_randomized,
        }
    }
}

/// Option as shown to a candidate. There is deliberately no
/// `is_correct` field on this type, so the answer key cannot leak
/// through serialization.
#[derive(Debug, Clone, Serialize)]
pub struct PublicOptionView {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
}

impl From<&QuestionOption> for PublicOptionView {
    fn from(option: &QuestionOption) -> Self {
        Self {
            id: option.id,
            text: option.text.clone(),
            display_order: option.display_order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestionView {
    pub id: Uuid,
    pub text: String,
    pub question_type: String,
    pub points: i32,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
    pub options: Vec<PublicOptionView>,
}

impl PublicQuestionView {
    pub fn from_question(question: &Question, options: &[QuestionOption]) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            question_type: question.question_type.clone(),
            points: question.points,
            display_order: question.display_order,
            options: options.iter().map(PublicOptionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessExamResponse {
    pub candidate: Candidate,
    pub exam: PublicExamView,
    pub questions: Vec<PublicQuestionView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: Option<Uuid>,
    pub selected_option_id: Option<Uuid>,
    pub text_response: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitExamRequest {
    pub answers: Option<Vec<SubmittedAnswer>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitExamResponse {
    pub message: String,
    pub result: ExamResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn public_question_view_carries_no_answer_key() {
        let question_id = Uuid::new_v4();
        let question = Question {
            id: question_id,
            text: "2 + 2?".into(),
            question_type: crate::models::question::QUESTION_TYPE_MULTIPLE_CHOICE.into(),
            points: 10,
            display_order: Some(1),
            exam_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let options = vec![
            QuestionOption {
                id: Uuid::new_v4(),
                text: "4".into(),
                is_correct: true,
                display_order: Some(1),
                question_id,
            },
            QuestionOption {
                id: Uuid::new_v4(),
                text: "5".into(),
                is_correct: false,
                display_order: Some(2),
                question_id,
            },
        ];

        let view = PublicQuestionView::from_question(&question, &options);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("is_correct"));
        assert_eq!(view.options.len(), 2);
    }
}
