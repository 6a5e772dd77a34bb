use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCandidateRequest {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub exam_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCandidateRequest {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub exam_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateResponse {
    pub message: String,
    pub candidate: Candidate,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub success: bool,
    pub message: String,
    pub candidate: Candidate,
    pub access_link: String,
}
