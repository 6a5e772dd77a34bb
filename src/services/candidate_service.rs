use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::candidate_dto::UpdateCandidateRequest;
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::utils::token::generate_unique_link;

/// Candidates belong to a creator through their exam; every lookup
/// joins `exams` so foreign candidates read as absent.
#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        name: &str,
        email: &str,
        exam_id: Uuid,
    ) -> Result<Candidate> {
        let owned =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM exams WHERE id = $1 AND creator_id = $2")
                .bind(exam_id)
                .bind(creator_id)
                .fetch_optional(&self.pool)
                .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Exam not found or access denied".to_string()));
        }

        // The access link is assigned here, eagerly; it never changes
        // for the lifetime of the candidate.
        let unique_link = generate_unique_link();
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (name, email, unique_link, exam_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(unique_link)
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(candidate)
    }

    pub async fn list(&self, creator_id: Uuid) -> Result<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT c.* FROM candidates c
            JOIN exams e ON c.exam_id = e.id
            WHERE e.creator_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    pub async fn list_for_exam(&self, creator_id: Uuid, exam_id: Uuid) -> Result<Vec<Candidate>> {
        let owned =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM exams WHERE id = $1 AND creator_id = $2")
                .bind(exam_id)
                .bind(creator_id)
                .fetch_optional(&self.pool)
                .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Exam not found".to_string()));
        }

        let candidates = sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates WHERE exam_id = $1 ORDER BY created_at DESC",
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    pub async fn get(&self, creator_id: Uuid, candidate_id: Uuid) -> Result<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT c.* FROM candidates c
            JOIN exams e ON c.exam_id = e.id
            WHERE c.id = $1 AND e.creator_id = $2
            "#,
        )
        .bind(candidate_id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;
        candidate.ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }

    pub async fn update(
        &self,
        creator_id: Uuid,
        candidate_id: Uuid,
        payload: UpdateCandidateRequest,
    ) -> Result<Candidate> {
        // Moving a candidate to another exam re-checks ownership of
        // the target exam.
        if let Some(new_exam_id) = payload.exam_id {
            let owned = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM exams WHERE id = $1 AND creator_id = $2",
            )
            .bind(new_exam_id)
            .bind(creator_id)
            .fetch_optional(&self.pool)
            .await?;
            if owned.is_none() {
                return Err(Error::NotFound("Exam not found or access denied".to_string()));
            }
        }

        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            UPDATE candidates c
            SET name = COALESCE($3, c.name),
                email = COALESCE($4, c.email),
                exam_id = COALESCE($5, c.exam_id),
                updated_at = NOW()
            FROM exams e
            WHERE c.id = $1 AND c.exam_id = e.id AND e.creator_id = $2
            RETURNING c.*
            "#,
        )
        .bind(candidate_id)
        .bind(creator_id)
        .bind(payload.name)
        .bind(payload.email)
        .bind(payload.exam_id)
        .fetch_optional(&self.pool)
        .await?;
        candidate.ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }

    pub async fn delete(&self, creator_id: Uuid, candidate_id: Uuid) -> Result<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM candidates c
            USING exams e
            WHERE c.exam_id = e.id AND c.id = $1 AND e.creator_id = $2
            "#,
        )
        .bind(candidate_id)
        .bind(creator_id)
        .execute(&self.pool)
        .await?;
        if deleted.rows_affected() == 0 {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }
        Ok(())
    }

    pub async fn mark_invited(&self, candidate_id: Uuid) -> Result<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            UPDATE candidates
            SET invitation_sent = TRUE, last_invited_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(candidate)
    }
}
