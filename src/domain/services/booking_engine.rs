use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use crate::domain::{
    models::{booking::{BookedTicket, Booking, NewBookingParams}, parse_id},
    ports::{BookingRepository, EventRepository, UserRepository},
    services::{inventory, pricing},
};
use crate::error::AppError;
use tokio::time::sleep;
use tracing::{info, warn};

pub const RETRY_EXHAUSTED_MESSAGE: &str =
    "Booking conflict: The event details were updated by someone else. Please try again.";

const BACKOFF_STEP: Duration = Duration::from_millis(25);

pub struct BookingRequest {
    pub event_id: String,
    pub customer_id: String,
    pub tickets: Vec<BookedTicket>,
    pub discount_percent: Option<f64>,
}

#[derive(Debug)]
pub struct Cancellation {
    pub booking_id: String,
    pub restored_quantity: i64,
    pub unrestored: Vec<BookedTicket>,
}

/// Runs the check-decrement-record sequence for bookings and its inverse for
/// cancellations. Each attempt reads the event, applies the inventory change in
/// memory and hands both writes to the ledger as one version-guarded
/// transaction; lost races are retried against a fresh read.
pub struct BookingEngine {
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserRepository>,
    bookings: Arc<dyn BookingRepository>,
    max_attempts: u32,
}

impl BookingEngine {
    pub fn new(
        events: Arc<dyn EventRepository>,
        users: Arc<dyn UserRepository>,
        bookings: Arc<dyn BookingRepository>,
        max_attempts: u32,
    ) -> Self {
        Self { events, users, bookings, max_attempts: max_attempts.max(1) }
    }

    pub async fn book(&self, request: BookingRequest) -> Result<Booking, AppError> {
        let event_id = parse_id(&request.event_id, "event")?;
        inventory::validate_line_items(&request.tickets)?;
        let discount_percent = pricing::validate_discount(request.discount_percent)?;

        let booking = self
            .with_retry("book", || self.try_book(&event_id, &request, discount_percent))
            .await?;

        info!(
            booking_id = %booking.id,
            event_id = %booking.event.event_id,
            quantity = booking.total_quantity_booked(),
            "Booking confirmed"
        );
        Ok(booking)
    }

    async fn try_book(&self, event_id: &str, request: &BookingRequest, discount_percent: f64) -> Result<Booking, AppError> {
        let customer = self.users.find_by_id(&request.customer_id).await?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

        let mut event = self.events.find_by_id(event_id).await?
            .ok_or_else(|| AppError::NotFound("Event not found.".into()))?;

        let expected_version = event.version;
        let reservation = inventory::reserve(&mut event, &request.tickets)?;

        let booking = Booking::new(NewBookingParams {
            customer: &customer,
            event: &event,
            booked_tickets: request.tickets.clone(),
            total_amount: reservation.total_amount,
            discount_percent,
        });

        self.bookings.create_with_inventory(&booking, &event, expected_version).await
    }

    pub async fn cancel(&self, booking_id: &str, requester_id: &str) -> Result<Cancellation, AppError> {
        let booking_id = parse_id(booking_id, "booking")?;

        let cancellation = self
            .with_retry("cancel", || self.try_cancel(&booking_id, requester_id))
            .await?;

        info!(
            booking_id = %cancellation.booking_id,
            restored = cancellation.restored_quantity,
            "Booking cancelled and tickets restored"
        );
        Ok(cancellation)
    }

    async fn try_cancel(&self, booking_id: &str, requester_id: &str) -> Result<Cancellation, AppError> {
        let booking = self.bookings.find_by_id(booking_id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found.".into()))?;

        if !booking.is_owned_by(requester_id) {
            return Err(AppError::Forbidden("You are not authorized to delete this booking.".into()));
        }

        let mut event = self.events.find_by_id(&booking.event.event_id).await?
            .ok_or_else(|| AppError::NotFound("Associated event not found.".into()))?;

        let expected_version = event.version;
        let restoration = inventory::restore(&mut event, &booking.booked_tickets);

        for line in &restoration.unrestored {
            warn!(
                booking_id = %booking.id,
                event_id = %event.id,
                ticket_type = %line.ticket_type_name,
                quantity = line.quantity,
                "Ticket type no longer exists on event; quantity not restored"
            );
        }

        self.bookings.delete_with_inventory(&booking.id, &event, expected_version).await?;

        Ok(Cancellation {
            booking_id: booking.id,
            restored_quantity: restoration.restored_quantity,
            unrestored: restoration.unrestored,
        })
    }

    pub async fn get_details(&self, booking_id: &str, requester_id: &str) -> Result<Booking, AppError> {
        let booking_id = parse_id(booking_id, "booking")?;

        let booking = self.bookings.find_by_id(&booking_id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found.".into()))?;

        if !booking.is_owned_by(requester_id) {
            return Err(AppError::Forbidden("You are not authorized to view this booking.".into()));
        }
        Ok(booking)
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut attempt_once: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt = 1;
        loop {
            match attempt_once().await {
                Err(e) if e.is_retryable() => {
                    if attempt >= self.max_attempts {
                        warn!(operation, attempts = attempt, "Retry budget exhausted: {}", e);
                        return Err(AppError::Conflict(RETRY_EXHAUSTED_MESSAGE.into()));
                    }
                    warn!(operation, attempt, "Concurrent write detected, retrying: {}", e);
                    sleep(BACKOFF_STEP * attempt).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
