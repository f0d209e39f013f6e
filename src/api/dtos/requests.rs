use crate::domain::models::{
    booking::BookedTicket,
    event::{EventStatus, Location, TicketType},
    user::Role,
};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub profile_picture: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgetPasswordRequest {
    pub email: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// `?page&limit`. Unparseable values fall back to the defaults.
#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

impl PageQuery {
    /// Returns `(page, limit, offset)`.
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        (page, limit, (page - 1) * limit)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v > 0)
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub show_past: Option<String>,
}

impl EventListQuery {
    pub fn show_past(&self) -> bool {
        self.show_past.as_deref() == Some("true")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub ticket_types: Option<Vec<TicketType>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub ticket_types: Option<Vec<TicketType>>,
    pub status: Option<EventStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketLineRequest {
    pub ticket_type_name: Option<String>,
    pub ticket_quantity: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub event_id: Option<String>,
    pub tickets: Option<Vec<TicketLineRequest>>,
    pub discount_percent: Option<f64>,
}

const MISSING_BOOKING_FIELDS: &str = "Event ID and non-empty array ticket are required.";
const INVALID_TICKET_LINE: &str =
    "Each ticket entry must include a valid ticketTypeName and a ticketQuantity of at least 1.";

impl CreateBookingRequest {
    /// Splits the wire body into the event id and the line items the engine books.
    pub fn into_parts(self) -> Result<(String, Vec<BookedTicket>, Option<f64>), AppError> {
        let event_id = self.event_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_BOOKING_FIELDS.into()))?;

        let lines = self.tickets
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_BOOKING_FIELDS.into()))?;

        let tickets = lines
            .into_iter()
            .map(|line| {
                let name = line.ticket_type_name
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| AppError::Validation(INVALID_TICKET_LINE.into()))?;
                let quantity = line.ticket_quantity
                    .filter(|q| *q >= 1)
                    .and_then(|q| u32::try_from(q).ok())
                    .ok_or_else(|| AppError::Validation(INVALID_TICKET_LINE.into()))?;
                Ok(BookedTicket { ticket_type_name: name, quantity })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok((event_id, tickets, self.discount_percent))
    }
}
