use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::public_dto::SubmittedAnswer;
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::models::exam::Exam;
use crate::models::question::{Question, QuestionOption};
use crate::models::result::ExamResult;
use crate::services::question_service::group_options;
use crate::services::result_service::recalculate_score;

/// Public, unauthenticated exam taking. A candidate is identified only
/// by the unique link; the flow is NOT_STARTED -> IN_PROGRESS ->
/// COMPLETED, and COMPLETED is terminal.
#[derive(Clone)]
pub struct SessionService {
    pool: PgPool,
}

impl SessionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn access_exam(
        &self,
        unique_link: &str,
    ) -> Result<(Candidate, Exam, Vec<(Question, Vec<QuestionOption>)>)> {
        let candidate =
            sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE unique_link = $1")
                .bind(unique_link)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Invalid access link".to_string()))?;

        if candidate.is_test_completed {
            return Err(Error::Conflict("Test already completed".to_string()));
        }

        // First access stamps the start time; later calls keep the
        // original stamp.
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            UPDATE candidates
            SET test_start_time = COALESCE(test_start_time, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(candidate.id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let exam = sqlx::query_as::<_, Exam>("SELECT * FROM exams WHERE id = $1")
            .bind(candidate.exam_id)
            .fetch_one(&self.pool)
            .await?;

        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE exam_id = $1 ORDER BY display_order, created_at",
        )
        .bind(exam.id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let options = sqlx::query_as::<_, QuestionOption>(
            "SELECT * FROM options WHERE question_id = ANY($1) ORDER BY display_order, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        let mut grouped = group_options(options);

        let questions = questions
            .into_iter()
            .map(|q| {
                let options = grouped.remove(&q.id).unwrap_or_default();
                (q, options)
            })
            .collect();

        Ok((candidate, exam, questions))
    }

    /// One transaction covers the completed-flag flip, the result row,
    /// every answer row and the scoring pass: a crash mid-way leaves no
    /// half-submitted candidate behind.
    pub async fn submit_exam(
        &self,
        unique_link: &str,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<ExamResult> {
        let mut tx = self.pool.begin().await?;

        // Single conditional check-and-set: when two submissions race,
        // exactly one sees rows_affected = 1.
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            UPDATE candidates
            SET is_test_completed = TRUE, test_end_time = $2, updated_at = NOW()
            WHERE unique_link = $1 AND is_test_completed = FALSE
            RETURNING *
            "#,
        )
        .bind(unique_link)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let candidate = match candidate {
            Some(candidate) => candidate,
            None => {
                let existing = sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM candidates WHERE unique_link = $1",
                )
                .bind(unique_link)
                .fetch_optional(&mut *tx)
                .await?;
                return Err(match existing {
                    None => Error::NotFound("Invalid access link".to_string()),
                    Some(_) => Error::Conflict("Test already completed".to_string()),
                });
            }
        };

        let result = sqlx::query_as::<_, ExamResult>(
            "INSERT INTO results (candidate_id, exam_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(candidate.id)
        .bind(candidate.exam_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut seen_questions = HashSet::new();
        for answer in answers {
            let Some(question_id) = answer.question_id else {
                continue;
            };
            // A question answered twice counts once; repeats are dropped.
            if !seen_questions.insert(question_id) {
                continue;
            }

            // The stored question decides how the answer is persisted;
            // ids from other exams are unknown here and skipped.
            let question = sqlx::query_as::<_, Question>(
                "SELECT * FROM questions WHERE id = $1 AND exam_id = $2",
            )
            .bind(question_id)
            .bind(candidate.exam_id)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(question) = question else {
                continue;
            };

            if question.is_multiple_choice() {
                // An option id that does not belong to this question is
                // stored as no selection, which scores zero.
                let selected = match answer.selected_option_id {
                    Some(option_id) => sqlx::query_scalar::<_, Uuid>(
                        "SELECT id FROM options WHERE id = $1 AND question_id = $2",
                    )
                    .bind(option_id)
                    .bind(question.id)
                    .fetch_optional(&mut *tx)
                    .await?,
                    None => None,
                };
                sqlx::query(
                    "INSERT INTO answers (result_id, question_id, selected_option_id) VALUES ($1, $2, $3)",
                )
                .bind(result.id)
                .bind(question.id)
                .bind(selected)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    "INSERT INTO answers (result_id, question_id, text_response) VALUES ($1, $2, $3)",
                )
                .bind(result.id)
                .bind(question.id)
                .bind(answer.text_response)
                .execute(&mut *tx)
                .await?;
            }
        }

        let result = recalculate_score(&mut tx, result.id).await?;
        tx.commit().await?;

        tracing::info!(
            candidate_id = %candidate.id,
            result_id = %result.id,
            score = ?result.score,
            "Exam submitted and scored"
        );
        Ok(result)
    }
}
