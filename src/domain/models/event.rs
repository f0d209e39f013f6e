use crate::domain::models::user::User;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Declined,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Declined => "declined",
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "declined" => Ok(EventStatus::Declined),
            other => Err(AppError::Validation(format!("Unknown event status '{}'", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Location {
    pub venue: String,
    pub city: String,
    pub country: String,
}

/// A named class of fungible tickets. `quantity` is what is still for sale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TicketType {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    #[sqlx(rename = "organizer_id")]
    pub user_id: String,
    #[sqlx(rename = "organizer_name")]
    pub full_name: String,
    #[sqlx(rename = "organizer_picture")]
    pub profile_picture: String,
}

impl From<&User> for Organizer {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            full_name: user.full_name(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    #[sqlx(flatten)]
    pub location: Location,
    pub category: String,
    pub image_url: String,
    pub ticket_types: Json<Vec<TicketType>>,
    pub tickets_available: i64,
    pub tickets_sold: i64,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    #[sqlx(flatten)]
    pub organizer: Organizer,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: Location,
    pub category: String,
    pub image_url: String,
    pub ticket_types: Vec<TicketType>,
    pub organizer: Organizer,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let mut event = Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            event_date: params.event_date,
            location: params.location,
            category: params.category,
            image_url: params.image_url,
            ticket_types: Json(params.ticket_types),
            tickets_available: 0,
            tickets_sold: 0,
            status: EventStatus::Pending,
            organizer: params.organizer,
            version: 0,
            created_at: Utc::now(),
        };
        event.recount_available();
        event
    }

    pub fn total_tickets(&self) -> i64 {
        self.tickets_available + self.tickets_sold
    }

    pub fn remaining_quantity(&self) -> i64 {
        self.ticket_types.iter().map(|t| t.quantity as i64).sum()
    }

    /// Resets `tickets_available` to the sum of per-type remaining quantities.
    pub fn recount_available(&mut self) {
        self.tickets_available = self.remaining_quantity();
    }

    pub fn find_ticket_type(&self, name: &str) -> Option<usize> {
        self.ticket_types.iter().position(|t| t.name == name)
    }
}

pub fn validate_ticket_types(ticket_types: &[TicketType]) -> Result<(), AppError> {
    for (i, ticket_type) in ticket_types.iter().enumerate() {
        if ticket_type.name.trim().is_empty() {
            return Err(AppError::Validation("Ticket type name is required".into()));
        }
        if !ticket_type.price.is_finite() || ticket_type.price < 0.0 {
            return Err(AppError::Validation(format!("Ticket type '{}' must have a price of at least 0", ticket_type.name)));
        }
        if ticket_types[..i].iter().any(|t| t.name == ticket_type.name) {
            return Err(AppError::Validation(format!("Duplicate ticket type '{}'", ticket_type.name)));
        }
    }
    Ok(())
}

pub fn validate_location(location: &Location) -> Result<(), AppError> {
    if location.venue.trim().is_empty() || location.city.trim().is_empty() || location.country.trim().is_empty() {
        return Err(AppError::Validation("Location requires venue, city and country".into()));
    }
    Ok(())
}
