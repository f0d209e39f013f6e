use axum::{extract::{Path, Query, State}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::{
    requests::{CreateEventRequest, EventListQuery, PageQuery, UpdateEventRequest},
    responses::{page_count, EventPage, EventPagination, EventView},
};
use crate::domain::models::{
    event::{validate_location, validate_ticket_types, Event, NewEventParams, Organizer},
    parse_id,
    user::Role,
};
use crate::domain::ports::EventQuery;
use chrono::Utc;
use sqlx::types::Json as JsonColumn;
use std::sync::Arc;
use tracing::info;

const EVENT_NOT_FOUND: &str = "Event not found";

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

async fn load_event(state: &AppState, raw_id: &str) -> Result<Event, AppError> {
    let id = parse_id(raw_id, "event")?;
    state.event_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(EVENT_NOT_FOUND.into()))
}

/// Organizers may only touch their own events; admins may touch any.
fn ensure_can_manage(auth: &AuthUser, event: &Event) -> Result<(), AppError> {
    auth.require_role(&[Role::Organizer, Role::Admin])?;
    if auth.role == Role::Organizer && event.organizer.user_id != auth.id {
        return Err(AppError::Forbidden("You are not authorized to modify this event.".into()));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Organizer])?;

    let title = required_text(payload.title, "Title")?;
    let category = required_text(payload.category, "Category")?;
    let event_date = payload.event_date
        .ok_or_else(|| AppError::Validation("Event date is required".into()))?;
    let location = payload.location
        .ok_or_else(|| AppError::Validation("Location is required".into()))?;
    validate_location(&location)?;
    let ticket_types = payload.ticket_types.unwrap_or_default();
    validate_ticket_types(&ticket_types)?;

    let organizer = state.user_repo.find_by_id(&auth.id).await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    let event = Event::new(NewEventParams {
        title,
        description: payload.description.unwrap_or_default(),
        event_date,
        location,
        category,
        image_url: payload.image_url.unwrap_or_default(),
        ticket_types,
        organizer: Organizer::from(&organizer),
    });

    let created = state.event_repo.create(&event).await?;
    info!(event_id = %created.id, organizer_id = %auth.id, tickets = created.tickets_available, "Event created");

    Ok((StatusCode::CREATED, Json(EventView::from(created))))
}

async fn event_page(state: &AppState, query: EventQuery, page: i64) -> Result<EventPage, AppError> {
    let events = state.event_repo.list(&query).await?;
    let total = state.event_repo.count(&query).await?;

    Ok(EventPage {
        events: events.into_iter().map(EventView::from).collect(),
        pagination: EventPagination { total, page, limit: query.limit, pages: page_count(total, query.limit) },
    })
}

pub async fn list_approved_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = query.page.resolve();
    let starting_after = if query.show_past() { None } else { Some(Utc::now()) };

    let filter = EventQuery { approved_only: true, starting_after, limit, offset };
    Ok(Json(event_page(&state, filter, page).await?))
}

pub async fn list_all_events(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_role(&[Role::Admin])?;
    let (page, limit, offset) = query.resolve();

    let filter = EventQuery { approved_only: false, starting_after: None, limit, offset };
    Ok(Json(event_page(&state, filter, page).await?))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(EventView::from(load_event(&state, &id).await?)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    ensure_can_manage(&auth, &event)?;
    let expected_version = event.version;

    if let Some(status) = payload.status {
        if auth.role != Role::Admin {
            return Err(AppError::Forbidden("Only administrators can change event status.".into()));
        }
        event.status = status;
    }
    if payload.title.is_some() {
        event.title = required_text(payload.title, "Title")?;
    }
    if payload.category.is_some() {
        event.category = required_text(payload.category, "Category")?;
    }
    if let Some(description) = payload.description {
        event.description = description;
    }
    if let Some(event_date) = payload.event_date {
        event.event_date = event_date;
    }
    if let Some(location) = payload.location {
        validate_location(&location)?;
        event.location = location;
    }
    if let Some(image_url) = payload.image_url {
        event.image_url = image_url;
    }
    if let Some(ticket_types) = payload.ticket_types {
        validate_ticket_types(&ticket_types)?;
        // tickets_sold is history; only the on-sale quantities are replaced.
        event.ticket_types = JsonColumn(ticket_types);
        event.recount_available();
    }

    let updated = state.event_repo.update(&event, expected_version).await?;
    info!(event_id = %updated.id, version = updated.version, editor_id = %auth.id, "Event updated");

    Ok(Json(EventView::from(updated)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &id).await?;
    ensure_can_manage(&auth, &event)?;

    if !state.event_repo.delete(&event.id).await? {
        return Err(AppError::NotFound(EVENT_NOT_FOUND.into()));
    }

    info!(event_id = %event.id, editor_id = %auth.id, "Event deleted");
    Ok(Json(serde_json::json!({"message": "Event deleted successfully"})))
}
