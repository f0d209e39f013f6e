use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::{
    requests::{PageQuery, UpdateProfileRequest, UpdateRoleRequest},
    responses::{page_count, BookingView, DataResponse, EventView, ListResponse, MessageResponse, UserPage, UserPagination},
};
use crate::domain::models::{parse_id, user::{Role, User}};
use std::sync::Arc;
use tracing::info;

const USER_NOT_FOUND: &str = "User not found";

async fn load_user(state: &AppState, id: &str) -> Result<User, AppError> {
    state.user_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Admin])?;
    let (page, limit, offset) = query.resolve();

    let users = state.user_repo.list(limit, offset).await?;
    let total = state.user_repo.count().await?;

    Ok(Json(UserPage {
        success: true,
        count: users.len(),
        total,
        pagination: UserPagination { page, limit, total_pages: page_count(total, limit) },
        data: users,
    }))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(DataResponse::ok(load_user(&state, &auth.id).await?)))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = load_user(&state, &auth.id).await?;

    if let Some(first_name) = payload.first_name {
        if first_name.trim().is_empty() {
            return Err(AppError::Validation("First name cannot be empty".into()));
        }
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = payload.last_name {
        if last_name.trim().is_empty() {
            return Err(AppError::Validation("Last name cannot be empty".into()));
        }
        user.last_name = last_name.trim().to_string();
    }
    if let Some(picture) = payload.profile_picture
        && !picture.trim().is_empty()
    {
        user.profile_picture = picture;
    }

    let updated = state.user_repo.update_profile(&user).await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    info!(user_id = %updated.id, "Profile updated");
    Ok(Json(DataResponse::ok(updated)))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::User])?;
    let bookings = state.booking_repo.list_by_customer(&auth.id).await?;
    Ok(Json(ListResponse::ok(bookings.into_iter().map(BookingView::from).collect())))
}

pub async fn my_events(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Organizer])?;
    let events = state.event_repo.list_by_organizer(&auth.id).await?;
    Ok(Json(ListResponse::ok(events.into_iter().map(EventView::from).collect())))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Admin])?;
    let id = parse_id(&id, "user")?;
    Ok(Json(DataResponse::ok(load_user(&state, &id).await?)))
}

pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Admin])?;
    let id = parse_id(&id, "user")?;

    let updated = state.user_repo.update_role(&id, payload.role).await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    info!(user_id = %updated.id, role = updated.role.as_str(), admin_id = %auth.id, "Role changed");
    Ok(Json(DataResponse::ok(updated)))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Admin])?;
    let id = parse_id(&id, "user")?;

    if !state.user_repo.delete(&id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.into()));
    }

    info!(user_id = %id, admin_id = %auth.id, "User deleted");
    Ok(Json(MessageResponse::ok("User deleted successfully")))
}
