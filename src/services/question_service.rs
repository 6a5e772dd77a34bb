use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::question_dto::{OptionPayload, UpdateQuestionRequest};
use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionOption, QUESTION_TYPE_MULTIPLE_CHOICE};

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        exam_id: Uuid,
        text: &str,
        question_type: &str,
        points: i32,
        display_order: Option<i32>,
        options: Option<Vec<OptionPayload>>,
    ) -> Result<(Question, Vec<QuestionOption>)> {
        let owned =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM exams WHERE id = $1 AND creator_id = $2")
                .bind(exam_id)
                .bind(creator_id)
                .fetch_optional(&self.pool)
                .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Exam not found or access denied".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (text, question_type, points, display_order, exam_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(question_type)
        .bind(points)
        .bind(display_order)
        .bind(exam_id)
        .fetch_one(&mut *tx)
        .await?;

        // Options only make sense for multiple-choice questions;
        // anything supplied for an open-ended one is ignored.
        let mut created_options = Vec::new();
        if question.question_type == QUESTION_TYPE_MULTIPLE_CHOICE {
            if let Some(options) = options {
                created_options = insert_options(&mut tx, question.id, options).await?;
            }
        }
        tx.commit().await?;

        Ok((question, created_options))
    }

    pub async fn get(
        &self,
        creator_id: Uuid,
        question_id: Uuid,
    ) -> Result<(Question, Vec<QuestionOption>)> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.* FROM questions q
            JOIN exams e ON q.exam_id = e.id
            WHERE q.id = $1 AND e.creator_id = $2
            "#,
        )
        .bind(question_id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        let options = self.options_for(question.id).await?;
        Ok((question, options))
    }

    pub async fn list_for_exam(
        &self,
        creator_id: Uuid,
        exam_id: Uuid,
    ) -> Result<Vec<(Question, Vec<QuestionOption>)>> {
        let owned =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM exams WHERE id = $1 AND creator_id = $2")
                .bind(exam_id)
                .bind(creator_id)
                .fetch_optional(&self.pool)
                .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Exam not found".to_string()));
        }

        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE exam_id = $1 ORDER BY display_order, created_at",
        )
        .bind(exam_id)
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

        Ok(questions
            .into_iter()
            .map(|q| {
                let options = grouped.remove(&q.id).unwrap_or_default();
                (q, options)
            })
            .collect())
    }

    pub async fn update(
        &self,
        creator_id: Uuid,
        question_id: Uuid,
        payload: UpdateQuestionRequest,
    ) -> Result<(Question, Vec<QuestionOption>)> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions q
            SET text = COALESCE($3, q.text),
                question_type = COALESCE($4, q.question_type),
                points = COALESCE($5, q.points),
                display_order = COALESCE($6, q.display_order),
                updated_at = NOW()
            FROM exams e
            WHERE q.id = $1 AND q.exam_id = e.id AND e.creator_id = $2
            RETURNING q.*
            "#,
        )
        .bind(question_id)
        .bind(creator_id)
        .bind(payload.text)
        .bind(payload.question_type)
        .bind(payload.points)
        .bind(payload.order)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        // Supplied options fully replace the existing set; there is no
        // merge by option id.
        if question.question_type == QUESTION_TYPE_MULTIPLE_CHOICE {
            if let Some(options) = payload.options {
                sqlx::query("DELETE FROM options WHERE question_id = $1")
                    .bind(question.id)
                    .execute(&mut *tx)
                    .await?;
                insert_options(&mut tx, question.id, options).await?;
            }
        }
        tx.commit().await?;

        let options = self.options_for(question.id).await?;
        Ok((question, options))
    }

    pub async fn delete(&self, creator_id: Uuid, question_id: Uuid) -> Result<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM questions q
            USING exams e
            WHERE q.exam_id = e.id AND q.id = $1 AND e.creator_id = $2
            "#,
        )
        .bind(question_id)
        .bind(creator_id)
        .execute(&self.pool)
        .await?;
        if deleted.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    async fn options_for(&self, question_id: Uuid) -> Result<Vec<QuestionOption>> {
        let options = sqlx::query_as::<_, QuestionOption>(
            "SELECT * FROM options WHERE question_id = $1 ORDER BY display_order, id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(options)
    }
}

async fn insert_options(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    question_id: Uuid,
    options: Vec<OptionPayload>,
) -> Result<Vec<QuestionOption>> {
    let mut created = Vec::with_capacity(options.len());
    for option in options {
        let text = option.text.ok_or_else(|| {
            Error::BadRequest("Missing required field: options[].text".to_string())
        })?;
        let row = sqlx::query_as::<_, QuestionOption>(
            r#"
            INSERT INTO options (text, is_correct, display_order, question_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(option.is_correct.unwrap_or(false))
        .bind(option.order)
        .bind(question_id)
        .fetch_one(&mut **tx)
        .await?;
        created.push(row);
    }
    Ok(created)
}

pub(crate) fn group_options(options: Vec<QuestionOption>) -> HashMap<Uuid, Vec<QuestionOption>> {
    let mut grouped: HashMap<Uuid, Vec<QuestionOption>> = HashMap::new();
    for option in options {
        grouped.entry(option.question_id).or_default().push(option);
    }
    grouped
}
