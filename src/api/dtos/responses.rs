use crate::domain::models::{booking::{BookedTicket, Booking}, event::Event, user::User};
use serde::Serialize;

/// Event as served over HTTP, with the derived ticket total.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub total_tickets: i64,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        let total_tickets = event.total_tickets();
        Self { event, total_tickets }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub total_quantity_booked: u64,
    pub final_price: f64,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        let total_quantity_booked = booking.total_quantity_booked();
        let final_price = booking.final_price();
        Self { booking, total_quantity_booked, final_price }
    }
}

#[derive(Serialize)]
pub struct EventPagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[derive(Serialize)]
pub struct EventPage {
    pub events: Vec<EventView>,
    pub pagination: EventPagination,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPagination {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Serialize)]
pub struct UserPage {
    pub success: bool,
    pub count: usize,
    pub total: i64,
    pub pagination: UserPagination,
    pub data: Vec<User>,
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self { success: true, count: data.len(), data }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub message: &'static str,
    pub booking: BookingView,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub booking: BookingView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub message: &'static str,
    pub unrestored_tickets: Vec<BookedTicket>,
}

pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 { 0 } else { (total + limit - 1) / limit }
}
