use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::candidate::Candidate;
use crate::models::outbox::OutboxMessage;

/// Persistent outbox for invitation mail. Requests only enqueue; a
/// worker loop delivers rows to the mail gateway so no handler ever
/// blocks on outbound HTTP.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    client: Client,
    target_url: String,
}

impl NotificationService {
    pub fn new(pool: PgPool, target_url: String) -> Self {
        Self {
            pool,
            client: Client::new(),
            target_url,
        }
    }

    pub async fn enqueue(&self, event_type: &str, payload: &JsonValue) -> Result<OutboxMessage> {
        let row = sqlx::query_as::<_, OutboxMessage>(
            r#"
            INSERT INTO invitation_outbox (event_type, payload, target_url)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(event_type)
        .bind(payload)
        .bind(&self.target_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn enqueue_invitation(
        &self,
        candidate: &Candidate,
        exam_title: &str,
        access_link: &str,
    ) -> Result<OutboxMessage> {
        let payload = json!({
            "event": "invitation",
            "to": candidate.email,
            "candidate_name": candidate.name,
            "exam_title": exam_title,
            "access_link": access_link,
        });
        self.enqueue("invitation", &payload).await
    }

    pub async fn deliver_once(&self, message_id: Uuid) -> Result<()> {
        let message =
            sqlx::query_as::<_, OutboxMessage>("SELECT * FROM invitation_outbox WHERE id = $1")
                .bind(message_id)
                .fetch_one(&self.pool)
                .await?;

        let res = self
            .client
            .post(&message.target_url)
            .json(&message.payload)
            .send()
            .await;
        match res {
            Ok(resp) => {
                let status = resp.status().as_u16() as i32;
                let body = resp.text().await.unwrap_or_default();
                sqlx::query(
                    r#"
                    UPDATE invitation_outbox
                    SET http_status = $1,
                        response_body = $2,
                        status = CASE WHEN $1 BETWEEN 200 AND 299 THEN 'success' ELSE 'failed' END,
                        attempts = attempts + 1,
                        updated_at = NOW()
                    WHERE id = $3
                    "#,
                )
                .bind(status)
                .bind(body)
                .bind(message.id)
                .execute(&self.pool)
                .await?;
            }
            Err(err) => {
                sqlx::query(
                    r#"
                    UPDATE invitation_outbox
                    SET response_body = $1, status = 'failed', attempts = attempts + 1, updated_at = NOW()
                    WHERE id = $2
                    "#,
                )
                .bind(format!("{}", err))
                .bind(message.id)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    /// Delivers at most one pending message. Returns false when the
    /// queue is empty so the caller can back off.
    pub async fn run_once(&self) -> Result<bool> {
        let row_opt = sqlx::query(
            r#"SELECT id FROM invitation_outbox
               WHERE status = 'pending' AND (next_retry_at IS NULL OR next_retry_at <= NOW())
               ORDER BY created_at ASC
               FOR UPDATE SKIP LOCKED
               LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row_opt else { return Ok(false) };
        let id: Uuid = row.try_get("id")?;

        let _ = self.deliver_once(id).await;

        let row2 = sqlx::query(
            "SELECT attempts, max_attempts, status FROM invitation_outbox WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        let attempts: i32 = row2.try_get("attempts")?;
        let max_attempts: i32 = row2.try_get("max_attempts")?;
        let status: String = row2.try_get("status")?;

        if status == "failed" && attempts < max_attempts {
            sqlx::query(
                r#"UPDATE invitation_outbox
                   SET status = 'pending',
                       next_retry_at = NOW() + make_interval(secs => LEAST(3600, 30 * power(2::float, GREATEST(0, attempts - 1))::int))
                   WHERE id = $1"#,
            )
            .bind(id)
            .execute(&self.pool)
            .await?;
        }

        Ok(true)
    }
}
