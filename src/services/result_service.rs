use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::result_dto::EvaluationEntry;
use crate::error::{Error, Result};
use crate::models::result::{Answer, ExamResult};

/// Scores multiple-choice answers and stores the aggregate on the
/// result. Both statements are pure functions of the current rows, so
/// running the pass any number of times yields the same score.
pub(crate) async fn recalculate_score(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    result_id: Uuid,
) -> Result<ExamResult> {
    sqlx::query(
        r#"
        UPDATE answers a
        SET points_awarded = CASE
                WHEN EXISTS (
                    SELECT 1 FROM options o
                    WHERE o.id = a.selected_option_id
                      AND o.question_id = a.question_id
                      AND o.is_correct
                ) THEN q.points
                ELSE 0
            END
        FROM questions q
        WHERE q.id = a.question_id
          AND a.result_id = $1
          AND q.question_type = 'multiple_choice'
        "#,
    )
    .bind(result_id)
    .execute(&mut **tx)
    .await?;

    // Open-ended answers contribute only once a reviewer has set their
    // points; until then they stay NULL and are left out of the sum.
    let result = sqlx::query_as::<_, ExamResult>(
        r#"
        UPDATE results r
        SET score = (
            SELECT COALESCE(SUM(a.points_awarded), 0)
            FROM answers a
            WHERE a.result_id = r.id AND a.points_awarded IS NOT NULL
        )
        WHERE r.id = $1
        RETURNING *
        "#,
    )
    .bind(result_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(result)
}

#[derive(Clone)]
pub struct ResultService {
    pool: PgPool,
}

impl ResultService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, creator_id: Uuid, result_id: Uuid) -> Result<(ExamResult, Vec<Answer>)> {
        let result = self.get_owned(creator_id, result_id).await?;
        let answers = self.answers_for(result.id).await?;
        Ok((result, answers))
    }

    pub async fn list_for_exam(&self, creator_id: Uuid, exam_id: Uuid) -> Result<Vec<ExamResult>> {
        let owned =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM exams WHERE id = $1 AND creator_id = $2")
                .bind(exam_id)
                .bind(creator_id)
                .fetch_optional(&self.pool)
                .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Exam not found".to_string()));
        }

        let results = sqlx::query_as::<_, ExamResult>(
            "SELECT * FROM results WHERE exam_id = $1 ORDER BY created_at DESC",
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    pub async fn get_for_candidate(
        &self,
        creator_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<(ExamResult, Vec<Answer>)> {
        let owned = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT c.id FROM candidates c
            JOIN exams e ON c.exam_id = e.id
            WHERE c.id = $1 AND e.creator_id = $2
            "#,
        )
        .bind(candidate_id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }

        let result =
            sqlx::query_as::<_, ExamResult>("SELECT * FROM results WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Result not found".to_string()))?;
        let answers = self.answers_for(result.id).await?;
        Ok((result, answers))
    }

    /// Applies reviewer points to open-ended answers, then recomputes
    /// the aggregate. Entries that do not resolve to an open-ended
    /// answer of this result are skipped, not rejected.
    pub async fn evaluate(
        &self,
        creator_id: Uuid,
        result_id: Uuid,
        evaluations: Vec<EvaluationEntry>,
        feedback: Option<String>,
    ) -> Result<(ExamResult, Vec<Answer>)> {
        let result = self.get_owned(creator_id, result_id).await?;

        let mut tx = self.pool.begin().await?;
        for entry in evaluations {
            let (Some(answer_id), Some(points_awarded)) = (entry.answer_id, entry.points_awarded)
            else {
                continue;
            };
            sqlx::query(
                r#"
                UPDATE answers a
                SET points_awarded = $3
                FROM questions q
                WHERE a.id = $1 AND a.result_id = $2
                  AND q.id = a.question_id
                  AND q.question_type = 'open_ended'
                "#,
            )
            .bind(answer_id)
            .bind(result.id)
            .bind(points_awarded)
            .execute(&mut *tx)
            .await?;
        }

        let mut result = recalculate_score(&mut tx, result.id).await?;

        if feedback.is_some() {
            result = sqlx::query_as::<_, ExamResult>(
                "UPDATE results SET feedback = $2 WHERE id = $1 RETURNING *",
            )
            .bind(result.id)
            .bind(feedback)
            .fetch_one(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        let answers = self.answers_for(result.id).await?;
        Ok((result, answers))
    }

    async fn get_owned(&self, creator_id: Uuid, result_id: Uuid) -> Result<ExamResult> {
        let result = sqlx::query_as::<_, ExamResult>(
            r#"
            SELECT r.* FROM results r
            JOIN exams e ON r.exam_id = e.id
            WHERE r.id = $1 AND e.creator_id = $2
            "#,
        )
        .bind(result_id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;
        result.ok_or_else(|| Error::NotFound("Result not found".to_string()))
    }

    async fn answers_for(&self, result_id: Uuid) -> Result<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT a.* FROM answers a
            JOIN questions q ON a.question_id = q.id
            WHERE a.result_id = $1
            ORDER BY q.display_order, a.id
            "#,
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(answers)
    }
}
