use crate::domain::models::{event::{Event, Location}, user::User};
use crate::domain::services::pricing;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Canceled => "canceled",
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "canceled" => Ok(BookingStatus::Canceled),
            other => Err(AppError::Validation(format!("Unknown booking status '{}'", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookedTicket {
    pub ticket_type_name: String,
    pub quantity: u32,
}

/// Customer facts as they were when the booking was made.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    #[sqlx(rename = "customer_id")]
    pub user_id: String,
    #[sqlx(rename = "customer_name")]
    pub full_name: String,
    #[sqlx(rename = "customer_picture")]
    pub profile_picture: String,
}

impl From<&User> for CustomerSnapshot {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            full_name: user.full_name(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

/// Event facts as they were when the booking was made. Later edits to the
/// event do not reach back into existing bookings.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub event_id: String,
    #[sqlx(rename = "event_title")]
    pub title: String,
    #[sqlx(flatten)]
    pub location: Location,
    #[sqlx(rename = "event_category")]
    pub category: String,
}

impl From<&Event> for EventSnapshot {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            location: event.location.clone(),
            category: event.category.clone(),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub booked_tickets: Json<Vec<BookedTicket>>,
    pub total_amount: f64,
    pub discount_percent: f64,
    #[sqlx(flatten)]
    pub customer: CustomerSnapshot,
    #[sqlx(flatten)]
    pub event: EventSnapshot,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams<'a> {
    pub customer: &'a User,
    pub event: &'a Event,
    pub booked_tickets: Vec<BookedTicket>,
    pub total_amount: f64,
    pub discount_percent: f64,
}

impl Booking {
    pub fn new(params: NewBookingParams<'_>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booked_tickets: Json(params.booked_tickets),
            total_amount: params.total_amount,
            discount_percent: params.discount_percent,
            customer: CustomerSnapshot::from(params.customer),
            event: EventSnapshot::from(params.event),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    pub fn total_quantity_booked(&self) -> u64 {
        self.booked_tickets.iter().map(|t| t.quantity as u64).sum()
    }

    pub fn final_price(&self) -> f64 {
        pricing::final_price(self.total_amount, self.discount_percent)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.customer.user_id == user_id
    }
}
