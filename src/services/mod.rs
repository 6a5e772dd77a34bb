pub mod candidate_service;
pub mod exam_service;
pub mod notification_service;
pub mod question_service;
pub mod result_service;
pub mod session_service;
pub mod user_service;
