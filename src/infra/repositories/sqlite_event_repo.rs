use crate::domain::{models::event::Event, ports::{EventQuery, EventRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, SqliteConnection, SqlitePool};

const STALE_EVENT_MESSAGE: &str = "Event was modified concurrently";

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Writes the inventory columns of `event` inside the caller's transaction,
/// provided nobody has bumped the row past `expected_version`.
pub(crate) async fn save_inventory(conn: &mut SqliteConnection, event: &Event, expected_version: i64) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE events SET ticket_types = ?, tickets_available = ?, tickets_sold = ?, version = version + 1
         WHERE id = ? AND version = ?"
    )
        .bind(Json(&event.ticket_types.0))
        .bind(event.tickets_available)
        .bind(event.tickets_sold)
        .bind(&event.id)
        .bind(expected_version)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(STALE_EVENT_MESSAGE.into()));
    }
    Ok(())
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, event_date, venue, city, country, category, image_url,
                ticket_types, tickets_available, tickets_sold, status,
                organizer_id, organizer_name, organizer_picture, version, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.event_date)
            .bind(&event.location.venue)
            .bind(&event.location.city)
            .bind(&event.location.country)
            .bind(&event.category)
            .bind(&event.image_url)
            .bind(Json(&event.ticket_types.0))
            .bind(event.tickets_available)
            .bind(event.tickets_sold)
            .bind(event.status.as_str())
            .bind(&event.organizer.user_id)
            .bind(&event.organizer.full_name)
            .bind(&event.organizer.profile_picture)
            .bind(event.version)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events
             WHERE (? = 0 OR status = 'approved') AND (? IS NULL OR event_date >= ?)
             ORDER BY event_date ASC LIMIT ? OFFSET ?"
        )
            .bind(query.approved_only)
            .bind(query.starting_after)
            .bind(query.starting_after)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, query: &EventQuery) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM events
             WHERE (? = 0 OR status = 'approved') AND (? IS NULL OR event_date >= ?)"
        )
            .bind(query.approved_only)
            .bind(query.starting_after)
            .bind(query.starting_after)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = ? ORDER BY created_at DESC")
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event, expected_version: i64) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=?, description=?, event_date=?, venue=?, city=?, country=?, category=?, image_url=?,
                ticket_types=?, tickets_available=?, tickets_sold=?, status=?, version = version + 1
               WHERE id=? AND version=? RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.event_date)
            .bind(&event.location.venue)
            .bind(&event.location.city)
            .bind(&event.location.country)
            .bind(&event.category)
            .bind(&event.image_url)
            .bind(Json(&event.ticket_types.0))
            .bind(event.tickets_available)
            .bind(event.tickets_sold)
            .bind(event.status.as_str())
            .bind(&event.id)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::Conflict(STALE_EVENT_MESSAGE.into()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
