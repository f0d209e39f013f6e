use crate::domain::{models::{booking::Booking, event::Event}, ports::BookingRepository};
use crate::error::AppError;
use crate::infra::repositories::sqlite_event_repo::save_inventory;
use async_trait::async_trait;
use sqlx::{types::Json, SqlitePool};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE customer_id = ? ORDER BY created_at DESC")
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_with_inventory(&self, booking: &Booking, event: &Event, expected_version: i64) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        save_inventory(&mut tx, event, expected_version).await?;

        let saved = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (
                id, booked_tickets, total_amount, discount_percent,
                customer_id, customer_name, customer_picture,
                event_id, event_title, venue, city, country, event_category,
                status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&booking.id)
            .bind(Json(&booking.booked_tickets.0))
            .bind(booking.total_amount)
            .bind(booking.discount_percent)
            .bind(&booking.customer.user_id)
            .bind(&booking.customer.full_name)
            .bind(&booking.customer.profile_picture)
            .bind(&booking.event.event_id)
            .bind(&booking.event.title)
            .bind(&booking.event.location.venue)
            .bind(&booking.event.location.city)
            .bind(&booking.event.location.country)
            .bind(&booking.event.category)
            .bind(booking.status.as_str())
            .bind(booking.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn delete_with_inventory(&self, booking_id: &str, event: &Event, expected_version: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let deleted = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        // A concurrent cancel already removed it; its inventory was restored there.
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking not found.".into()));
        }

        save_inventory(&mut tx, event, expected_version).await?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
