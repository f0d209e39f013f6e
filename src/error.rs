use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{error, warn};

static EXPOSE_INTERNAL_DETAILS: OnceLock<bool> = OnceLock::new();

/// Enables internal error detail in 5xx bodies. Only honoured once per process.
pub fn expose_internal_details(enabled: bool) {
    let _ = EXPOSE_INTERNAL_DETAILS.set(enabled);
}

fn internal_details_exposed() -> bool {
    EXPOSE_INTERNAL_DETAILS.get().copied().unwrap_or(false)
}

// 2067/1555 = SQLite unique/primary key constraint, 23505 = PostgreSQL unique violation
const UNIQUE_VIOLATION_CODES: &[&str] = &["2067", "1555", "23505"];
// 5/6/517 = SQLite BUSY/LOCKED/BUSY_SNAPSHOT, 40001/40P01 = PostgreSQL serialization failure/deadlock
const RETRYABLE_CODES: &[&str] = &["5", "6", "517", "40001", "40P01"];

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Insufficient inventory: {0}")]
    InsufficientInventory(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// True when re-running the whole unit of work may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Conflict(_) => true,
            AppError::Database(e) => database_code(e)
                .map(|code| RETRYABLE_CODES.contains(&code.as_str()))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// True when a write collided with a unique key.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, AppError::Database(e) if is_unique_violation(e))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(sqlx::Error::PoolTimedOut) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::InvalidId(_) | AppError::InsufficientInventory(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal | AppError::InternalWithMsg(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Database(sqlx::Error::PoolTimedOut) => "Service temporarily unavailable".to_string(),
            AppError::Database(e) if is_unique_violation(e) => "Resource already exists (duplicate entry)".to_string(),
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => {
                "Internal server error".to_string()
            }
            AppError::Unauthorized => "Not authorized, token missing or invalid".to_string(),
            AppError::Validation(msg)
            | AppError::InvalidId(msg)
            | AppError::InsufficientInventory(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
        }
    }
}

fn database_code(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    database_code(e)
        .map(|code| UNIQUE_VIOLATION_CODES.contains(&code.as_str()))
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.public_message();

        let body = if status.is_server_error() {
            match &self {
                AppError::InternalWithMsg(msg) => error!("Internal error: {}", msg),
                other => error!("Request failed: {:?}", other),
            }
            if internal_details_exposed() {
                json!({ "message": message, "errors": [self.to_string()] })
            } else {
                json!({ "message": message })
            }
        } else {
            if status == StatusCode::CONFLICT {
                warn!("Conflict: {}", self);
            }
            json!({ "message": message })
        };

        (status, Json(body)).into_response()
    }
}
