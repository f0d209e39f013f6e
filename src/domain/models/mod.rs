pub mod auth;
pub mod booking;
pub mod event;
pub mod user;

use crate::error::AppError;
use uuid::Uuid;

/// Normalizes a path/body identifier, rejecting anything that is not a UUID.
pub fn parse_id(raw: &str, entity: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidId(format!("Invalid {} ID format.", entity)))
}
