use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::ticket::tickets_of_event;
use super::EVENT_COLUMNS;
use crate::models::{Event, NewEvent};
use crate::repositories::EventRepository;
use crate::utils::{AppError, Result};

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn save(&self, event: NewEvent) -> Result<Event> {
        let mut tx = self.pool.begin().await?;

        if let Some(series_id) = event.series_id {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM series WHERE id = $1)")
                    .bind(series_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists {
                return Err(AppError::not_found("series", series_id));
            }
        }

        let now = Utc::now();
        let saved = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (organizer_id, series_id, name, description, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.organizer_id)
        .bind(event.series_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::persistence("event"))?;

        tx.commit().await.map_err(AppError::persistence("event"))?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match event {
            Some(mut event) => {
                event.tickets = tickets_of_event(&self.pool, event.id).await?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }
}
