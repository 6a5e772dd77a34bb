use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    // Assigned once at creation, never rotated or reused.
    pub unique_link: String,
    pub is_test_completed: bool,
    pub test_start_time: Option<DateTime<Utc>>,
    pub test_end_time: Option<DateTime<Utc>>,
    pub invitation_sent: bool,
    pub last_invited_at: Option<DateTime<Utc>>,
    pub exam_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
