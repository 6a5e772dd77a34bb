pub mod auth_dto;
pub mod candidate_dto;
pub mod exam_dto;
pub mod public_dto;
pub mod question_dto;
pub mod result_dto;
