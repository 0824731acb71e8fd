use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::ticket::tickets_of_event;
use super::{EVENT_COLUMNS, SERIES_COLUMNS};
use crate::models::{Event, NewSeries, Series};
use crate::repositories::SeriesRepository;
use crate::utils::{AppError, Result};

#[derive(Clone)]
pub struct PgSeriesRepository {
    pool: PgPool,
}

impl PgSeriesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_events(&self, series: Option<Series>) -> Result<Option<Series>> {
        let Some(mut series) = series else {
            return Ok(None);
        };

        let mut events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE series_id = $1 ORDER BY id ASC"
        ))
        .bind(series.id)
        .fetch_all(&self.pool)
        .await?;

        for event in &mut events {
            event.tickets = tickets_of_event(&self.pool, event.id).await?;
        }
        series.events = events;

        Ok(Some(series))
    }
}

#[async_trait]
impl SeriesRepository for PgSeriesRepository {
    async fn save(&self, series: NewSeries) -> Result<Series> {
        let saved = sqlx::query_as::<_, Series>(&format!(
            r#"
            INSERT INTO series (organizer_id, name, description, is_public, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {SERIES_COLUMNS}
            "#
        ))
        .bind(series.organizer_id)
        .bind(&series.name)
        .bind(&series.description)
        .bind(series.is_public)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::persistence("series"))?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Series>> {
        let series = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_events(series).await
    }

    async fn find_public_by_id(&self, id: i64) -> Result<Option<Series>> {
        let series = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE id = $1 AND is_public = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_events(series).await
    }

    async fn add_event(&self, series_id: i64, event_id: i64) -> Result<Series> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE series SET updated_at = $2 WHERE id = $1")
            .bind(series_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::persistence("series"))?;
        if touched.rows_affected() == 0 {
            return Err(AppError::not_found("series", series_id));
        }

        let linked = sqlx::query("UPDATE events SET series_id = $2, updated_at = $3 WHERE id = $1")
            .bind(event_id)
            .bind(series_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::persistence("event"))?;
        if linked.rows_affected() == 0 {
            return Err(AppError::not_found("event", event_id));
        }

        tx.commit().await.map_err(AppError::persistence("series"))?;

        self.find_by_id(series_id)
            .await?
            .ok_or_else(|| AppError::not_found("series", series_id))
    }
}
