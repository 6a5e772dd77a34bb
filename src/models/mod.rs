pub mod candidate;
pub mod exam;
pub mod outbox;
pub mod question;
pub mod result;
pub mod user;
