use crate::domain::models::{booking::Booking, event::Event, user::{Role, User}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub approved_only: bool,
    pub starting_after: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn update_profile(&self, user: &User) -> Result<Option<User>, AppError>;
    async fn update_role(&self, id: &str, role: Role) -> Result<Option<User>, AppError>;
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, AppError>;
    async fn count(&self, query: &EventQuery) -> Result<i64, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    /// Fails with `Conflict` unless the stored row is still at `expected_version`.
    async fn update(&self, event: &Event, expected_version: i64) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// The booking ledger. The `*_with_inventory` methods write the booking and
/// the event's inventory in a single transaction; the inventory write is
/// guarded by `expected_version` and fails with `Conflict` when another
/// writer got there first.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn create_with_inventory(&self, booking: &Booking, event: &Event, expected_version: i64) -> Result<Booking, AppError>;
    async fn delete_with_inventory(&self, booking_id: &str, event: &Event, expected_version: i64) -> Result<(), AppError>;
}
