use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgExecutor, PgPool};

use super::TICKET_COLUMNS;
use crate::models::{Event, NewTicket, Ticket};
use crate::repositories::TicketRepository;
use crate::utils::{AppError, Result};

#[derive(Clone)]
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) async fn tickets_of_event<'e>(
    executor: impl PgExecutor<'e>,
    event_id: i64,
) -> Result<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE event_id = $1 ORDER BY id ASC"
    ))
    .bind(event_id)
    .fetch_all(executor)
    .await?;

    Ok(tickets)
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn find_all_by_event_id(&self, event_id: i64) -> Result<Vec<Ticket>> {
        tickets_of_event(&self.pool, event_id).await
    }

    async fn save_for_event(&self, event: &Event, ticket: NewTicket) -> Result<(Ticket, Event)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Touching the event first row-locks it, so a concurrent delete
        // cannot slip in before the ticket insert.
        let updated = sqlx::query("UPDATE events SET updated_at = $2 WHERE id = $1")
            .bind(event.id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::persistence("event"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("event", event.id));
        }

        let saved = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (event_id, ticket_type, name, stock, number_available, price,
                                 discount_code, discount_price, percentage, purchase_limit,
                                 available_discounted_tickets, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&ticket.ticket_type)
        .bind(&ticket.name)
        .bind(ticket.stock)
        .bind(ticket.number_available)
        .bind(ticket.price)
        .bind(&ticket.discount_code)
        .bind(ticket.discount_price)
        .bind(ticket.percentage)
        .bind(ticket.purchase_limit)
        .bind(ticket.available_discounted_tickets)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::persistence("ticket"))?;

        let mut persisted = event.clone();
        persisted.updated_at = now;
        persisted.tickets = tickets_of_event(&mut *tx, event.id).await?;

        tx.commit().await.map_err(AppError::persistence("ticket"))?;

        Ok((saved, persisted))
    }
}
