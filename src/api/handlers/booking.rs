use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::{
    requests::CreateBookingRequest,
    responses::{BookingCreatedResponse, BookingResponse, BookingView, CancellationResponse},
};
use crate::domain::models::user::Role;
use crate::domain::services::booking_engine::BookingRequest;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::User])?;
    let (event_id, tickets, discount_percent) = payload.into_parts()?;

    info!("create_booking: customer {} booking event {}", auth.id, event_id);

    let booking = state.booking_engine.book(BookingRequest {
        event_id,
        customer_id: auth.id,
        tickets,
        discount_percent,
    }).await?;

    Ok((StatusCode::CREATED, Json(BookingCreatedResponse {
        message: "Booking created successfully",
        booking: BookingView::from(booking),
    })))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::User])?;
    let booking = state.booking_engine.get_details(&id, &auth.id).await?;
    Ok(Json(BookingResponse { booking: BookingView::from(booking) }))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::User])?;
    let cancellation = state.booking_engine.cancel(&id, &auth.id).await?;

    let message = if cancellation.unrestored.is_empty() {
        "Booking deleted successfully and tickets restored."
    } else {
        "Booking deleted; some ticket types no longer exist on the event and were not restored."
    };

    Ok(Json(CancellationResponse { message, unrestored_tickets: cancellation.unrestored }))
}
