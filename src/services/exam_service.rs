use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::exam_dto::UpdateExamRequest;
use crate::error::{Error, Result};
use crate::models::exam::Exam;

/// Every query is scoped by `creator_id`: an exam owned by someone else
/// is indistinguishable from one that does not exist.
#[derive(Clone)]
pub struct ExamService {
    pool: PgPool,
}

impl ExamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        title: &str,
        description: Option<String>,
        duration_minutes: i32,
        passing_score: i32,
        is_randomized: bool,
    ) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (title, description, duration_minutes, passing_score, is_randomized, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(duration_minutes)
        .bind(passing_score)
        .bind(is_randomized)
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exam)
    }

    pub async fn list(&self, creator_id: Uuid) -> Result<Vec<Exam>> {
        let exams = sqlx::query_as::<_, Exam>(
            "SELECT * FROM exams WHERE creator_id = $1 ORDER BY created_at DESC",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(exams)
    }

    pub async fn get(&self, creator_id: Uuid, exam_id: Uuid) -> Result<Exam> {
        let exam =
            sqlx::query_as::<_, Exam>("SELECT * FROM exams WHERE id = $1 AND creator_id = $2")
                .bind(exam_id)
                .bind(creator_id)
                .fetch_optional(&self.pool)
                .await?;
        exam.ok_or_else(|| Error::NotFound("Exam not found".to_string()))
    }

    pub async fn update(
        &self,
        creator_id: Uuid,
        exam_id: Uuid,
        payload: UpdateExamRequest,
    ) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            UPDATE exams
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                duration_minutes = COALESCE($5, duration_minutes),
                passing_score = COALESCE($6, passing_score),
                is_randomized = COALESCE($7, is_randomized),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1 AND creator_id = $2
            RETURNING *
            "#,
        )
        .bind(exam_id)
        .bind(creator_id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.duration_minutes)
        .bind(payload.passing_score)
        .bind(payload.is_randomized)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;
        exam.ok_or_else(|| Error::NotFound("Exam not found".to_string()))
    }

    pub async fn delete(&self, creator_id: Uuid, exam_id: Uuid) -> Result<()> {
        // Questions, options, candidates and results go with the exam
        // via ON DELETE CASCADE.
        let deleted = sqlx::query("DELETE FROM exams WHERE id = $1 AND creator_id = $2")
            .bind(exam_id)
            .bind(creator_id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(Error::NotFound("Exam not found".to_string()));
        }
        Ok(())
    }
}
