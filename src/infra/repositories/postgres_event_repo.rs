use crate::domain::{models::event::Event, ports::{EventQuery, EventRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, PgConnection, PgPool};

const STALE_EVENT_MESSAGE: &str = "Event was modified concurrently";

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Version-guarded inventory write, run on the caller's transaction.
pub(crate) async fn save_inventory(conn: &mut PgConnection, event: &Event, expected_version: i64) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE events SET ticket_types = $1, tickets_available = $2, tickets_sold = $3, version = version + 1
         WHERE id = $4 AND version = $5"
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
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, event_date, venue, city, country, category, image_url,
                ticket_types, tickets_available, tickets_sold, status,
                organizer_id, organizer_name, organizer_picture, version, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events
             WHERE (NOT $1 OR status = 'approved') AND ($2::timestamptz IS NULL OR event_date >= $2)
             ORDER BY event_date ASC LIMIT $3 OFFSET $4"
        )
            .bind(query.approved_only)
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
             WHERE (NOT $1 OR status = 'approved') AND ($2::timestamptz IS NULL OR event_date >= $2)"
        )
            .bind(query.approved_only)
            .bind(query.starting_after)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = $1 ORDER BY created_at DESC")
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event, expected_version: i64) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, description=$2, event_date=$3, venue=$4, city=$5, country=$6, category=$7, image_url=$8,
                ticket_types=$9, tickets_available=$10, tickets_sold=$11, status=$12, version = version + 1
               WHERE id=$13 AND version=$14 RETURNING *"#
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
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
