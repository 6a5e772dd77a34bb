pub mod auth;
pub mod candidates;
pub mod exams;
pub mod health;
pub mod public;
pub mod questions;
pub mod results;

/// Missing top-level fields are reported as the contract's 400 rather
/// than a deserialization failure.
pub(crate) fn require<T>(value: Option<T>, field: &str) -> crate::error::Result<T> {
    value.ok_or_else(|| {
        crate::error::Error::BadRequest(format!("Missing required field: {}", field))
    })
}
