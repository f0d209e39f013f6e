use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::json::ApiJson;
use crate::api::dtos::{
    requests::{ForgetPasswordRequest, LoginRequest, RegisterRequest},
    responses::MessageResponse,
};
use crate::domain::models::{
    auth::{AuthResponse, UserProfile},
    user::{NewUserParams, Role, User},
};
use std::sync::Arc;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const DUPLICATE_EMAIL: &str = "User with this email already exists";

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.into()))
}

fn auth_response(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = state.auth_service.issue_token(&user)?;
    Ok(AuthResponse { success: true, token, user: UserProfile::from(user) })
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    const MISSING: &str = "First name, last name, email and password are required";
    let first_name = required(payload.first_name, MISSING)?;
    let last_name = required(payload.last_name, MISSING)?;
    let email = required(payload.email, MISSING)?;
    let password = payload.password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING.into()))?;

    let role = payload.role.unwrap_or(Role::User);
    if role == Role::Admin {
        return Err(AppError::Validation("Role must be either 'user' or 'organizer'".into()));
    }

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Validation(DUPLICATE_EMAIL.into()));
    }

    let user = User::new(NewUserParams {
        first_name,
        last_name,
        email,
        password_hash: state.auth_service.hash_password(&password)?,
        role,
        profile_picture: payload.profile_picture,
    });

    // A concurrent registration can win the race past the lookup above.
    let user = state.user_repo.create(&user).await.map_err(|e| {
        if e.is_unique_violation() {
            AppError::Validation(DUPLICATE_EMAIL.into())
        } else {
            e
        }
    })?;
    info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = required(payload.email, INVALID_CREDENTIALS)?;
    let password = payload.password.unwrap_or_default();

    let user = state.user_repo.find_by_email(&email).await?
        .ok_or_else(|| AppError::Validation(INVALID_CREDENTIALS.into()))?;

    if !state.auth_service.verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "Rejected login with wrong password");
        return Err(AppError::Validation(INVALID_CREDENTIALS.into()));
    }

    info!("User logged in: {}", user.id);
    Ok(Json(auth_response(&state, user)?))
}

pub async fn forget_password(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ForgetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    const MISSING: &str = "Please provide both email and new password";
    let email = required(payload.email, MISSING)?;
    let new_password = payload.new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING.into()))?;

    let user = state.user_repo.find_by_email(&email).await?
        .ok_or_else(|| AppError::NotFound("No user found with that email".into()))?;

    let password_hash = state.auth_service.hash_password(&new_password)?;
    state.user_repo.update_password(&user.id, &password_hash).await?;

    info!("Password reset for user: {}", user.id);
    Ok(Json(MessageResponse::ok("Password updated successfully")))
}
